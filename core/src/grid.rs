use rkyv::{Archive, Deserialize, Serialize};

pub const TRAY_COLS_DEFAULT: u32 = 12;
pub const TRAY_ROWS_DEFAULT: u32 = 12;
pub const TRAY_CELL_SIZE_DEFAULT: f32 = 40.0;

// Object art overhangs the drawn tray toward the viewer, so the front edges
// accept a wider margin than the back edges. Measured in cells.
pub const FRONT_TOLERANCE_DEFAULT: f32 = 0.6;
pub const BACK_TOLERANCE_DEFAULT: f32 = 0.25;
pub const TOLERANCE_MAX: f32 = 2.0;

const ISO_X_DIVISOR: f32 = 1.5;
const ISO_Y_DIVISOR: f32 = 3.0;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub col: u32,
    pub row: u32,
}

impl GridCoord {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Painter depth: larger values sit closer to the viewer.
    pub fn depth(&self) -> u32 {
        self.col + self.row
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrayBounds {
    pub cols: u32,
    pub rows: u32,
    pub front_tolerance: f32,
    pub back_tolerance: f32,
}

impl TrayBounds {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            front_tolerance: FRONT_TOLERANCE_DEFAULT,
            back_tolerance: BACK_TOLERANCE_DEFAULT,
        }
    }

    pub fn with_tolerance(mut self, front: f32, back: f32) -> Self {
        self.front_tolerance = sanitize_tolerance(front);
        self.back_tolerance = sanitize_tolerance(back);
        self
    }

    pub fn max_col(&self) -> u32 {
        self.cols.max(1) - 1
    }

    pub fn max_row(&self) -> u32 {
        self.rows.max(1) - 1
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.col < self.cols && coord.row < self.rows
    }

    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord {
            col: coord.col.min(self.max_col()),
            row: coord.row.min(self.max_row()),
        }
    }

    /// Rounds fractional cell indices to the nearest legal cell.
    pub fn clamp_fractional(&self, col: f32, row: f32) -> GridCoord {
        GridCoord {
            col: round_clamped(col, self.max_col()),
            row: round_clamped(row, self.max_row()),
        }
    }

    /// Whether fractional cell indices land on the tray once the edge
    /// margins are taken into account.
    pub fn accepts_fractional(&self, col: f32, row: f32) -> bool {
        let low = -0.5 - self.back_tolerance;
        let high_col = self.max_col() as f32 + 0.5 + self.front_tolerance;
        let high_row = self.max_row() as f32 + 0.5 + self.front_tolerance;
        col >= low && row >= low && col <= high_col && row <= high_row
    }
}

impl Default for TrayBounds {
    fn default() -> Self {
        Self::new(TRAY_COLS_DEFAULT, TRAY_ROWS_DEFAULT)
    }
}

fn sanitize_tolerance(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, TOLERANCE_MAX)
    } else {
        0.0
    }
}

fn round_clamped(value: f32, max: u32) -> u32 {
    if !value.is_finite() {
        return if value == f32::INFINITY { max } else { 0 };
    }
    value.round().clamp(0.0, max as f32) as u32
}

pub fn to_projected(col: i32, row: i32, cell_size: f32) -> (f32, f32) {
    let axis_x = cell_size / ISO_X_DIVISOR;
    let axis_y = cell_size / ISO_Y_DIVISOR;
    ((col - row) as f32 * axis_x, (col + row) as f32 * axis_y)
}

pub fn to_grid_fractional(x: f32, y: f32, cell_size: f32) -> (f32, f32) {
    let cell_size = if cell_size.abs() < 1.0e-4 { 1.0e-4 } else { cell_size };
    let u = x / (cell_size / ISO_X_DIVISOR);
    let v = y / (cell_size / ISO_Y_DIVISOR);
    ((u + v) * 0.5, (v - u) * 0.5)
}

pub fn to_grid(x: f32, y: f32, cell_size: f32, bounds: &TrayBounds) -> GridCoord {
    let (col, row) = to_grid_fractional(x, y, cell_size);
    bounds.clamp_fractional(col, row)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrayGeometry {
    pub bounds: TrayBounds,
    pub cell_size: f32,
}

impl TrayGeometry {
    pub fn new(bounds: TrayBounds, cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            TRAY_CELL_SIZE_DEFAULT
        };
        Self { bounds, cell_size }
    }

    pub fn to_projected(&self, coord: GridCoord) -> (f32, f32) {
        to_projected(coord.col as i32, coord.row as i32, self.cell_size)
    }

    pub fn to_grid(&self, x: f32, y: f32) -> GridCoord {
        to_grid(x, y, self.cell_size, &self.bounds)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (col, row) = to_grid_fractional(x, y, self.cell_size);
        self.bounds.accepts_fractional(col, row)
    }

    /// Like [`TrayGeometry::to_grid`] but only for points on the tray.
    pub fn locate(&self, x: f32, y: f32) -> Option<GridCoord> {
        if self.contains(x, y) {
            Some(self.to_grid(x, y))
        } else {
            None
        }
    }

    /// Every cell, back to front.
    pub fn cells(&self) -> Vec<GridCoord> {
        let mut cells = Vec::with_capacity(self.bounds.cell_count());
        for row in 0..self.bounds.rows {
            for col in 0..self.bounds.cols {
                cells.push(GridCoord::new(col, row));
            }
        }
        cells.sort_by_key(GridCoord::depth);
        cells
    }

    /// Projected extent of the cell anchors: (min_x, min_y, max_x, max_y).
    pub fn projected_bounds(&self) -> (f32, f32, f32, f32) {
        let max_col = self.bounds.max_col();
        let max_row = self.bounds.max_row();
        let (left, _) = self.to_projected(GridCoord::new(0, max_row));
        let (right, _) = self.to_projected(GridCoord::new(max_col, 0));
        let (_, bottom) = self.to_projected(GridCoord::new(max_col, max_row));
        (left, 0.0, right, bottom)
    }
}

impl Default for TrayGeometry {
    fn default() -> Self {
        Self::new(TrayBounds::default(), TRAY_CELL_SIZE_DEFAULT)
    }
}
