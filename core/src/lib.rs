pub mod action;
pub mod catalog;
pub mod codec;
pub mod grid;
pub mod journal;
pub mod placement;
pub mod snapshot;
pub mod user_id;

pub use action::{apply_tray_action, PendingAsset, TrayAction};
pub use catalog::{AssetEntry, ThemeEntry, ASSET_CATALOG, DEFAULT_THEME_SLUG, THEME_CATALOG};
pub use codec::{decode, encode, CodecError};
pub use grid::{to_grid, to_projected, GridCoord, TrayBounds, TrayGeometry};
pub use journal::{Journal, JournalError, MemoryJournal};
pub use placement::{describe_layout, ObjectId, ObjectVisual, PlacedObject, PlacementStore};
pub use snapshot::{
    JournalSnapshot, Reframe, ReframeKind, Shard, ShardId, Talisman, TalismanSummary, TrayRules,
    JOURNAL_VERSION,
};
pub use user_id::{is_valid_user_id, UserId, UserIdError, USER_ID_MAX_LEN};
