use proptest::prelude::*;
use sandplay_core::grid::{to_grid_fractional, TRAY_CELL_SIZE_DEFAULT};
use sandplay_core::{to_grid, to_projected, GridCoord, TrayBounds, TrayGeometry, TrayRules};

fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
    assert!(
        (actual.0 - expected.0).abs() < 0.05 && (actual.1 - expected.1).abs() < 0.05,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn projects_reference_cells() {
    assert_close(to_projected(3, 3, 40.0), (0.0, 80.0));
    assert_close(to_projected(0, 0, 40.0), (0.0, 0.0));
    assert_close(to_projected(11, 0, 40.0), (293.3, 146.7));
}

#[test]
fn one_column_step_moves_right_and_down() {
    let (x0, y0) = to_projected(4, 4, 40.0);
    let (x1, y1) = to_projected(5, 4, 40.0);
    let (x2, y2) = to_projected(4, 5, 40.0);
    assert!(x1 > x0 && y1 > y0);
    assert!(x2 < x0 && y2 > y0);
}

#[test]
fn round_trips_every_default_cell() {
    let geometry = TrayGeometry::default();
    for cell in geometry.cells() {
        let (x, y) = geometry.to_projected(cell);
        assert_eq!(geometry.to_grid(x, y), cell);
    }
}

#[test]
fn far_pointer_clamps_to_last_column() {
    let bounds = TrayBounds::default();
    let (x, y) = to_projected(15, 0, 40.0);
    assert_eq!(to_grid(x, y, 40.0, &bounds), GridCoord::new(11, 0));
    let (x, y) = to_projected(-4, 20, 40.0);
    assert_eq!(to_grid(x, y, 40.0, &bounds), GridCoord::new(0, 11));
}

#[test]
fn non_finite_input_still_resolves() {
    let bounds = TrayBounds::default();
    assert_eq!(to_grid(f32::NAN, f32::NAN, 40.0, &bounds), GridCoord::new(0, 0));
    assert_eq!(
        to_grid(0.0, f32::INFINITY, 40.0, &bounds),
        GridCoord::new(11, 11)
    );
}

#[test]
fn front_edge_accepts_wider_margin_than_back_edge() {
    let geometry = TrayRules::default().geometry();
    // Past the front corner (11, 11) but inside the front margin.
    let (x, y) = to_projected(11, 11, TRAY_CELL_SIZE_DEFAULT);
    let front = (x, y + 1.6 * TRAY_CELL_SIZE_DEFAULT / 3.0);
    let (col, row) = to_grid_fractional(front.0, front.1, TRAY_CELL_SIZE_DEFAULT);
    assert!(col > 11.5 && row > 11.5);
    assert!(geometry.contains(front.0, front.1));
    assert_eq!(geometry.locate(front.0, front.1), Some(GridCoord::new(11, 11)));

    // The same distance behind the back corner (0, 0) is off the tray.
    let back = (0.0, -1.6 * TRAY_CELL_SIZE_DEFAULT / 3.0);
    assert!(!geometry.contains(back.0, back.1));
    assert_eq!(geometry.locate(back.0, back.1), None);
    assert_eq!(geometry.to_grid(back.0, back.1), GridCoord::new(0, 0));
}

#[test]
fn tolerance_is_configurable() {
    let rules = TrayRules {
        front_tolerance: 0.0,
        ..TrayRules::default()
    };
    let geometry = rules.geometry();
    let (x, y) = to_projected(11, 11, TRAY_CELL_SIZE_DEFAULT);
    assert!(!geometry.contains(x, y + 1.6 * TRAY_CELL_SIZE_DEFAULT / 3.0));
}

#[test]
fn cells_are_listed_back_to_front() {
    let geometry = TrayGeometry::new(TrayBounds::new(3, 2), 40.0);
    let cells = geometry.cells();
    assert_eq!(cells.len(), 6);
    assert_eq!(cells.first(), Some(&GridCoord::new(0, 0)));
    assert_eq!(cells.last(), Some(&GridCoord::new(2, 1)));
    assert!(cells.windows(2).all(|pair| pair[0].depth() <= pair[1].depth()));
}

#[test]
fn projected_bounds_cover_the_corners() {
    let geometry = TrayGeometry::default();
    let (min_x, min_y, max_x, max_y) = geometry.projected_bounds();
    for cell in geometry.cells() {
        let (x, y) = geometry.to_projected(cell);
        assert!(x >= min_x - 1.0e-3 && x <= max_x + 1.0e-3);
        assert!(y >= min_y - 1.0e-3 && y <= max_y + 1.0e-3);
    }
}

proptest! {
    #[test]
    fn inverse_recovers_any_legal_cell(
        cols in 2u32..40,
        rows in 2u32..40,
        cell_size in 8.0f32..120.0,
        col_frac in 0.0f64..1.0,
        row_frac in 0.0f64..1.0,
    ) {
        let bounds = TrayBounds::new(cols, rows);
        let col = ((cols as f64 * col_frac) as u32).min(cols - 1);
        let row = ((rows as f64 * row_frac) as u32).min(rows - 1);
        let (x, y) = to_projected(col as i32, row as i32, cell_size);
        prop_assert_eq!(to_grid(x, y, cell_size, &bounds), GridCoord::new(col, row));
    }

    #[test]
    fn forward_of_inverse_stays_within_a_cell(x in -280.0f32..280.0, y in 0.0f32..290.0) {
        let geometry = TrayGeometry::default();
        prop_assume!(geometry.contains(x, y));
        let cell = geometry.to_grid(x, y);
        let (px, py) = geometry.to_projected(cell);
        let (fx, fy) = to_grid_fractional(x - px, y - py, geometry.cell_size);
        let limit = 1.0 + geometry.bounds.front_tolerance;
        prop_assert!(fx.abs() <= limit && fy.abs() <= limit);
    }
}
