pub mod context;
mod editor_state;
pub mod persistence;

pub use context::{EditorContext, SegmentationStatus};
pub use editor_state::EditorState;
pub use persistence::{PersistenceError, PersistenceResult, SceneFile};
