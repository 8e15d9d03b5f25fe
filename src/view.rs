use sandplay_core::{GridCoord, TrayGeometry};

pub const VIEW_ZOOM_MIN: f32 = 0.5;
pub const VIEW_ZOOM_MAX: f32 = 3.0;
pub const VIEW_ZOOM_DEFAULT: f32 = 1.0;

// Where the back corner of the tray sits, as a fraction of the viewport.
const TRAY_ORIGIN_X_FRAC: f32 = 0.5;
const TRAY_ORIGIN_Y_FRAC: f32 = 0.2;

/// Screen placement of the tray: origin, pan offset and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrayView {
    viewport_w: f32,
    viewport_h: f32,
    pan_x: f32,
    pan_y: f32,
    zoom: f32,
}

impl TrayView {
    pub fn new(viewport_w: f32, viewport_h: f32) -> Self {
        Self {
            viewport_w: viewport_w.max(1.0),
            viewport_h: viewport_h.max(1.0),
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: VIEW_ZOOM_DEFAULT,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_w = width.max(1.0);
        self.viewport_h = height.max(1.0);
    }

    fn origin(&self) -> (f32, f32) {
        (
            self.viewport_w * TRAY_ORIGIN_X_FRAC + self.pan_x,
            self.viewport_h * TRAY_ORIGIN_Y_FRAC + self.pan_y,
        )
    }

    pub fn screen_to_projected(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        let (origin_x, origin_y) = self.origin();
        let zoom = self.zoom.max(1.0e-4);
        ((screen_x - origin_x) / zoom, (screen_y - origin_y) / zoom)
    }

    pub fn projected_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        let (origin_x, origin_y) = self.origin();
        (origin_x + x * self.zoom, origin_y + y * self.zoom)
    }

    pub fn cell_to_screen(&self, geometry: &TrayGeometry, cell: GridCoord) -> (f32, f32) {
        let (x, y) = geometry.to_projected(cell);
        self.projected_to_screen(x, y)
    }

    pub fn pan_by(&mut self, dx_screen: f32, dy_screen: f32) {
        if !dx_screen.is_finite() || !dy_screen.is_finite() {
            return;
        }
        self.pan_x += dx_screen;
        self.pan_y += dy_screen;
    }

    /// Zooms by `factor`, keeping the point under the anchor fixed.
    pub fn zoom_at(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let next = (self.zoom * factor).clamp(VIEW_ZOOM_MIN, VIEW_ZOOM_MAX);
        if (next - self.zoom).abs() <= f32::EPSILON {
            return;
        }
        let (px, py) = self.screen_to_projected(anchor_x, anchor_y);
        self.zoom = next;
        let (sx, sy) = self.projected_to_screen(px, py);
        self.pan_x += anchor_x - sx;
        self.pan_y += anchor_y - sy;
    }

    pub fn reset(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.zoom = VIEW_ZOOM_DEFAULT;
    }
}

impl Default for TrayView {
    fn default() -> Self {
        Self::new(1024.0, 600.0)
    }
}
