pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use input::{InputEvent, Modifiers};
pub use session::{CanvasMutation, CanvasSession, EditDraft, SceneSink};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{InteractionController, InteractionState, ToolKind};
