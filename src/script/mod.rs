pub mod engine_module;
pub mod error;
pub mod objects;
pub mod runtime;
pub mod watcher;

pub use engine_module::{EngineApi, EngineHost};
pub use error::ScriptError;
pub use objects::{ScriptObject, ScriptObjectManager};
pub use runtime::ScriptRuntime;
pub use watcher::{ScriptEvent, ScriptWatcher};
