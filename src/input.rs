use sandplay_core::{GridCoord, ObjectId, PlacementStore, TrayGeometry};

use crate::view::TrayView;

pub const DRAG_SLOP_PX_DEFAULT: f32 = 4.0;
pub const DOUBLE_TAP_MS_DEFAULT: f32 = 320.0;
pub const WHEEL_ZOOM_STEP_DEFAULT: f32 = 0.0015;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// What was under the pointer when it went down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Object(ObjectId),
    Tray(GridCoord),
    Outside,
}

pub fn hit_test(
    store: &PlacementStore,
    geometry: &TrayGeometry,
    view: &TrayView,
    screen_x: f32,
    screen_y: f32,
) -> PointerTarget {
    let (x, y) = view.screen_to_projected(screen_x, screen_y);
    let Some(cell) = geometry.locate(x, y) else {
        return PointerTarget::Outside;
    };
    match store.topmost_at(cell) {
        Some(object) => PointerTarget::Object(object.id()),
        None => PointerTarget::Tray(cell),
    }
}

fn cell_under(geometry: &TrayGeometry, view: &TrayView, screen_x: f32, screen_y: f32) -> GridCoord {
    let (x, y) = view.screen_to_projected(screen_x, screen_y);
    geometry.to_grid(x, y)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSettings {
    pub drag_slop_px: f32,
    pub double_tap_ms: f32,
    pub wheel_zoom_step: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            drag_slop_px: DRAG_SLOP_PX_DEFAULT,
            double_tap_ms: DOUBLE_TAP_MS_DEFAULT,
            wheel_zoom_step: WHEEL_ZOOM_STEP_DEFAULT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GesturePhase {
    Idle,
    PendingGesture {
        pointer: PointerId,
        target: PointerTarget,
    },
    Panning {
        pointer: PointerId,
    },
    DraggingObject {
        pointer: PointerId,
        id: ObjectId,
        cell: GridCoord,
    },
}

impl GesturePhase {
    fn pointer(&self) -> Option<PointerId> {
        match self {
            GesturePhase::Idle => None,
            GesturePhase::PendingGesture { pointer, .. }
            | GesturePhase::Panning { pointer }
            | GesturePhase::DraggingObject { pointer, .. } => Some(*pointer),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEffect {
    None,
    DropAt { cell: GridCoord },
    SelectObject { id: ObjectId },
    DeleteObject { id: ObjectId },
    MoveObject { id: ObjectId, cell: GridCoord },
    CommitObject { id: ObjectId, cell: GridCoord },
    Pan { dx: f32, dy: f32 },
    Zoom { factor: f32, anchor_x: f32, anchor_y: f32 },
}

#[derive(Clone, Copy, Debug)]
struct DragSlopGate {
    start: [f32; 2],
    slop: f32,
    moved: bool,
}

impl DragSlopGate {
    fn new(start_x: f32, start_y: f32, slop: f32) -> Self {
        Self {
            start: [start_x, start_y],
            slop,
            moved: false,
        }
    }

    fn update(&mut self, x: f32, y: f32) -> bool {
        if self.moved {
            return true;
        }
        let dx = x - self.start[0];
        let dy = y - self.start[1];
        if dx * dx + dy * dy > self.slop * self.slop {
            self.moved = true;
        }
        self.moved
    }
}

/// Turns raw pointer events into tray gestures. One pointer at a time.
#[derive(Clone, Debug)]
pub struct GestureMachine {
    settings: GestureSettings,
    phase: GesturePhase,
    gate: Option<DragSlopGate>,
    last: [f32; 2],
    last_tap: Option<(ObjectId, f32)>,
}

impl GestureMachine {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            phase: GesturePhase::Idle,
            gate: None,
            last: [0.0, 0.0],
            last_tap: None,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        x: f32,
        y: f32,
        target: PointerTarget,
    ) -> GestureEffect {
        if !self.is_idle() {
            tracing::trace!(?pointer, phase = ?self.phase, "gesture in progress, ignoring pointer");
            return GestureEffect::None;
        }
        self.phase = GesturePhase::PendingGesture { pointer, target };
        self.gate = Some(DragSlopGate::new(x, y, self.settings.drag_slop_px));
        self.last = [x, y];
        GestureEffect::None
    }

    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        x: f32,
        y: f32,
        geometry: &TrayGeometry,
        view: &TrayView,
    ) -> GestureEffect {
        if self.phase.pointer() != Some(pointer) {
            return GestureEffect::None;
        }
        let phase = self.phase;
        match phase {
            GesturePhase::Idle => GestureEffect::None,
            GesturePhase::PendingGesture { pointer, target } => {
                let moved = self.gate.as_mut().map(|gate| gate.update(x, y)).unwrap_or(true);
                if !moved {
                    return GestureEffect::None;
                }
                match target {
                    PointerTarget::Object(id) => {
                        let cell = cell_under(geometry, view, x, y);
                        self.phase = GesturePhase::DraggingObject { pointer, id, cell };
                        self.last_tap = None;
                        GestureEffect::MoveObject { id, cell }
                    }
                    PointerTarget::Tray(_) | PointerTarget::Outside => {
                        self.phase = GesturePhase::Panning { pointer };
                        self.pan_step(x, y)
                    }
                }
            }
            GesturePhase::Panning { .. } => self.pan_step(x, y),
            GesturePhase::DraggingObject { pointer, id, cell } => {
                let next = cell_under(geometry, view, x, y);
                if next == cell {
                    return GestureEffect::None;
                }
                self.phase = GesturePhase::DraggingObject {
                    pointer,
                    id,
                    cell: next,
                };
                GestureEffect::MoveObject { id, cell: next }
            }
        }
    }

    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        x: f32,
        y: f32,
        now_ms: f32,
        geometry: &TrayGeometry,
        view: &TrayView,
    ) -> GestureEffect {
        if self.phase.pointer() != Some(pointer) {
            return GestureEffect::None;
        }
        let phase = self.finish();
        match phase {
            GesturePhase::Idle | GesturePhase::Panning { .. } => GestureEffect::None,
            GesturePhase::PendingGesture { target, .. } => self.tap(target, now_ms),
            GesturePhase::DraggingObject { id, .. } => GestureEffect::CommitObject {
                id,
                cell: cell_under(geometry, view, x, y),
            },
        }
    }

    /// Cancel, lost capture or the pointer leaving the window. A drag keeps
    /// the last cell it reached.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> GestureEffect {
        if self.phase.pointer() != Some(pointer) {
            return GestureEffect::None;
        }
        match self.finish() {
            GesturePhase::DraggingObject { id, cell, .. } => GestureEffect::CommitObject { id, cell },
            _ => GestureEffect::None,
        }
    }

    pub fn wheel(&self, delta_y: f32, x: f32, y: f32) -> GestureEffect {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return GestureEffect::None;
        }
        GestureEffect::Zoom {
            factor: (-delta_y * self.settings.wheel_zoom_step).exp(),
            anchor_x: x,
            anchor_y: y,
        }
    }

    fn finish(&mut self) -> GesturePhase {
        self.gate = None;
        std::mem::replace(&mut self.phase, GesturePhase::Idle)
    }

    fn pan_step(&mut self, x: f32, y: f32) -> GestureEffect {
        let dx = x - self.last[0];
        let dy = y - self.last[1];
        self.last = [x, y];
        GestureEffect::Pan { dx, dy }
    }

    fn tap(&mut self, target: PointerTarget, now_ms: f32) -> GestureEffect {
        match target {
            PointerTarget::Object(id) => {
                let double = self.last_tap.is_some_and(|(last_id, last_ms)| {
                    last_id == id && (now_ms - last_ms).max(0.0) <= self.settings.double_tap_ms
                });
                if double {
                    self.last_tap = None;
                    GestureEffect::DeleteObject { id }
                } else {
                    self.last_tap = Some((id, now_ms));
                    GestureEffect::SelectObject { id }
                }
            }
            PointerTarget::Tray(cell) => {
                self.last_tap = None;
                GestureEffect::DropAt { cell }
            }
            PointerTarget::Outside => GestureEffect::None,
        }
    }
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(GestureSettings::default())
    }
}
