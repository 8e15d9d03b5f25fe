pub mod input;
pub mod persisted_store;
pub mod reflect;
pub mod session;
pub mod view;

pub use input::{
    hit_test, GestureEffect, GestureMachine, GesturePhase, GestureSettings, PointerId,
    PointerTarget,
};
pub use persisted_store::{FileJournal, JOURNAL_FILE_NAME, JOURNAL_TEMP_FILE_NAME};
pub use reflect::{normalize_reframes, ReflectError, ReflectionRequest, Reflector};
pub use session::{Destination, NavigationOutcome, Phase, SandplaySession, SessionError};
pub use view::{TrayView, VIEW_ZOOM_DEFAULT, VIEW_ZOOM_MAX, VIEW_ZOOM_MIN};
