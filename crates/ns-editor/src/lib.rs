pub mod band;
pub mod clone;
pub mod connect;
pub mod drag;
pub mod input;
pub mod notice;
pub mod refresh;
pub mod reshape;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod state;
pub mod storage;

pub use band::{BandGesture, BandMode};
pub use connect::ConnectionGesture;
pub use drag::DragGesture;
pub use input::{Modifiers, NodeIcon, PointerEvent, Tool};
pub use notice::{Notice, NoticeQueue};
pub use refresh::{RefreshCoalescer, RefreshSet};
pub use reshape::ReshapeGesture;
pub use session::EditorSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::EditorState;
pub use storage::{DOCUMENT_KEY, InMemoryStore, KeyValueStore};
