use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub game: GameConfig,
    pub scripting: ScriptingConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct GameConfig {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ScriptingConfig {
    /// Entry script, relative to the project root.
    pub entry_script: PathBuf,
    /// Operation budget per script run; 0 disables the limit.
    pub max_operations: u64,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl ProjectConfig {
    /// Load configuration with layering: built-in defaults → `project.toml`
    /// in the project root.
    pub fn load(project_root: &Path) -> Result<Self> {
        let defaults = include_str!("../config/default.toml");
        let mut config: ProjectConfig = toml::from_str(defaults)?;

        let project_file = project_root.join("project.toml");
        if project_file.exists() {
            let raw = fs::read_to_string(&project_file)?;
            config = toml::from_str(&raw)?; // TODO: deep merge instead of full replace
        }

        // Reject bad log levels up front rather than at subscriber setup.
        config.log.level()?;

        Ok(config)
    }

    pub fn entry_script_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.scripting.entry_script)
    }
}

impl LogConfig {
    /// Exactly the five level names. `Level`'s own `FromStr` also accepts
    /// numeric strings, which a properties file should not.
    pub fn level(&self) -> Result<Level> {
        match self.level.as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(anyhow!("unknown log level `{}` in [log]", self.level)),
        }
    }
}
