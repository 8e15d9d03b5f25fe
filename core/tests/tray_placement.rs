use sandplay_core::catalog::{asset_by_name, assets_for_theme, find_theme, default_theme};
use sandplay_core::{
    apply_tray_action, GridCoord, ObjectId, ObjectVisual, PendingAsset, PlacementStore,
    TrayAction, TrayBounds, THEME_CATALOG,
};

fn icon(name: &str) -> ObjectVisual {
    ObjectVisual::Icon {
        icon: name.to_string(),
    }
}

fn build_store() -> PlacementStore {
    let mut store = PlacementStore::new(TrayBounds::default());
    store.add("Tall Pine", icon("tree-pine"), GridCoord::new(3, 3), false);
    store.add("Bird", icon("bird"), GridCoord::new(0, 0), false);
    store.add("Shelter", icon("tent"), GridCoord::new(11, 0), false);
    store
}

#[test]
fn add_assigns_fresh_ids_in_order() {
    let store = build_store();
    let ids: Vec<ObjectId> = store.iter().map(|object| object.id()).collect();
    assert_eq!(ids, vec![ObjectId(1), ObjectId(2), ObjectId(3)]);
    let pine = store.get(ObjectId(1)).expect("pine");
    assert_eq!(pine.kind(), "Tall Pine");
    assert_eq!(pine.position(), GridCoord::new(3, 3));
    assert!(!pine.is_generated());
}

#[test]
fn add_clamps_out_of_range_positions() {
    let mut store = PlacementStore::default();
    let object = store.add("Tide", icon("waves"), GridCoord::new(15, 40), false);
    assert_eq!(object.position(), GridCoord::new(11, 11));
}

#[test]
fn move_unknown_id_leaves_store_unchanged() {
    let mut store = build_store();
    let before = store.objects().to_vec();
    assert!(!store.move_object(ObjectId(99), GridCoord::new(5, 5)));
    assert_eq!(store.objects(), before.as_slice());
}

#[test]
fn remove_unknown_id_leaves_store_unchanged() {
    let mut store = build_store();
    let before = store.objects().to_vec();
    assert!(store.remove(ObjectId(42)).is_none());
    assert_eq!(store.objects(), before.as_slice());
}

#[test]
fn move_keeps_identity_and_order() {
    let mut store = build_store();
    for step in 0..20 {
        store.move_object(ObjectId(2), GridCoord::new(step % 12, 4));
    }
    assert!(store.move_object(ObjectId(2), GridCoord::new(20, 9)));
    let ids: Vec<ObjectId> = store.iter().map(|object| object.id()).collect();
    assert_eq!(ids, vec![ObjectId(1), ObjectId(2), ObjectId(3)]);
    assert_eq!(store.get(ObjectId(2)).map(|o| o.position()), Some(GridCoord::new(11, 9)));
}

#[test]
fn clear_empties_and_ids_are_not_reused() {
    let mut store = build_store();
    store.clear();
    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
    let next = store.add("Bird", icon("bird"), GridCoord::new(1, 1), false);
    assert_eq!(next.id(), ObjectId(4));
}

#[test]
fn stacking_on_one_cell_keeps_both() {
    let mut store = PlacementStore::default();
    let first = store.add("Tide", icon("waves"), GridCoord::new(6, 6), false);
    let second = store.add("Inner Light", icon("sun"), GridCoord::new(6, 6), false);
    assert_eq!(store.len(), 2);
    assert!(store.get(first.id()).is_some());
    assert!(store.get(second.id()).is_some());
    assert_eq!(
        store.topmost_at(GridCoord::new(6, 6)).map(|o| o.id()),
        Some(second.id())
    );
}

#[test]
fn render_order_sorts_by_depth_and_is_stable() {
    let mut store = PlacementStore::default();
    store.add("a", icon("a"), GridCoord::new(5, 5), false);
    store.add("b", icon("b"), GridCoord::new(2, 1), false);
    store.add("c", icon("c"), GridCoord::new(1, 2), false);
    store.add("d", icon("d"), GridCoord::new(0, 0), false);
    store.add("e", icon("e"), GridCoord::new(3, 0), false);
    let kinds: Vec<&str> = store.render_order().iter().map(|o| o.kind()).collect();
    assert_eq!(kinds, vec!["d", "b", "c", "e", "a"]);
}

#[test]
fn layout_description_lists_kind_and_cell() {
    let store = build_store();
    assert_eq!(
        store.describe_layout(),
        "Tall Pine at (3, 3), Bird at (0, 0), Shelter at (11, 0)"
    );
}

#[test]
fn pending_assets_carry_their_visual() {
    let mut store = PlacementStore::default();
    let entry = asset_by_name("tall pine").expect("catalog asset");
    let pine = PendingAsset::from_entry(entry).place(&mut store, GridCoord::new(3, 3));
    assert_eq!(pine.visual().icon(), Some("tree-pine"));
    assert!(!pine.is_generated());

    let clock = PendingAsset::generated("old clock", "https://img.example/clock.png")
        .place(&mut store, GridCoord::new(4, 3));
    assert_eq!(clock.kind(), "old clock");
    assert_eq!(clock.visual().image_url(), Some("https://img.example/clock.png"));
    assert!(clock.is_generated());
}

#[test]
fn tray_actions_report_changes() {
    let mut store = PlacementStore::default();
    let asset = PendingAsset::Catalog {
        kind: "Bird".to_string(),
        icon: "bird".to_string(),
    };
    assert!(apply_tray_action(
        TrayAction::Drop { asset, at: GridCoord::new(2, 2) },
        &mut store
    ));
    let id = store.objects()[0].id();
    assert!(!apply_tray_action(TrayAction::Move { id, to: GridCoord::new(2, 2) }, &mut store));
    assert!(apply_tray_action(TrayAction::Move { id, to: GridCoord::new(3, 2) }, &mut store));
    assert!(!apply_tray_action(
        TrayAction::Move { id: ObjectId(77), to: GridCoord::new(1, 1) },
        &mut store
    ));
    assert!(!apply_tray_action(TrayAction::Remove { id: ObjectId(77) }, &mut store));
    assert!(apply_tray_action(TrayAction::Remove { id }, &mut store));
    assert!(!apply_tray_action(TrayAction::Clear, &mut store));
}

#[test]
fn catalog_groups_assets_by_theme() {
    assert_eq!(THEME_CATALOG.len(), 3);
    assert_eq!(default_theme().slug, "forest");
    let sea = find_theme("Deep Sea").expect("deep sea");
    assert_eq!(find_theme("deep-sea"), Some(sea));
    let names: Vec<&str> = assets_for_theme(sea.slug).map(|a| a.name).collect();
    assert_eq!(names, vec!["Tide", "Heavy Anchor", "Old Compass", "Inner Light"]);
    assert!(find_theme("Desert").is_none());
}
