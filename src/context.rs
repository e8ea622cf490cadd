use std::sync::atomic::{AtomicBool, Ordering};

pub const ENGINE_NAME: &str = "Crimson";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine identity and run state, shared between host systems and scripts.
#[derive(Debug, Default)]
pub struct EngineContext {
    running: AtomicBool,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine_name(&self) -> &'static str {
        ENGINE_NAME
    }

    pub fn engine_version(&self) -> &'static str {
        ENGINE_VERSION
    }

    pub fn set_running(&self, value: bool) {
        self.running.store(value, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
