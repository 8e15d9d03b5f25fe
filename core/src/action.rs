use crate::catalog::AssetEntry;
use crate::grid::GridCoord;
use crate::placement::{ObjectId, ObjectVisual, PlacedObject, PlacementStore};

/// An asset chosen by the user but not yet dropped on the tray.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAsset {
    Catalog { kind: String, icon: String },
    Generated { prompt: String, url: String },
}

impl PendingAsset {
    pub fn from_entry(entry: &AssetEntry) -> Self {
        PendingAsset::Catalog {
            kind: entry.name.to_string(),
            icon: entry.icon.to_string(),
        }
    }

    pub fn generated(prompt: impl Into<String>, url: impl Into<String>) -> Self {
        PendingAsset::Generated {
            prompt: prompt.into(),
            url: url.into(),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            PendingAsset::Catalog { kind, .. } => kind,
            PendingAsset::Generated { prompt, .. } => prompt,
        }
    }

    pub fn place(self, store: &mut PlacementStore, at: GridCoord) -> PlacedObject {
        match self {
            PendingAsset::Catalog { kind, icon } => {
                store.add(kind, ObjectVisual::Icon { icon }, at, false)
            }
            PendingAsset::Generated { prompt, url } => {
                store.add(prompt, ObjectVisual::Image { url }, at, true)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum TrayAction {
    Drop { asset: PendingAsset, at: GridCoord },
    Move { id: ObjectId, to: GridCoord },
    Remove { id: ObjectId },
    Clear,
}

/// Applies `action` and reports whether the store changed.
pub fn apply_tray_action(action: TrayAction, store: &mut PlacementStore) -> bool {
    match action {
        TrayAction::Drop { asset, at } => {
            asset.place(store, at);
            true
        }
        TrayAction::Move { id, to } => {
            let Some(current) = store.get(id).map(PlacedObject::position) else {
                return false;
            };
            if current == store.bounds().clamp(to) {
                return false;
            }
            store.move_object(id, to)
        }
        TrayAction::Remove { id } => store.remove(id).is_some(),
        TrayAction::Clear => {
            if store.is_empty() {
                return false;
            }
            store.clear();
            true
        }
    }
}
