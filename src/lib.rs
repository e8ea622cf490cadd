//! Scripting runtime for the Crimson 2D game engine.
//!
//! The host embeds a [rhai](https://rhai.rs) interpreter, exposes engine
//! services to scripts through the `engine` module, and instantiates
//! script-defined classes such as the demo `Player`. See
//! [`script::ScriptObjectManager`] for the class convention scripts follow.

pub mod config;
pub mod context;
pub mod script;

pub use config::ProjectConfig;
pub use context::EngineContext;
