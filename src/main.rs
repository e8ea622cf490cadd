use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crimson_script::config::ProjectConfig;
use crimson_script::context::{self, EngineContext};
use crimson_script::script::{EngineApi, EngineHost, ScriptObjectManager, ScriptRuntime};

fn main() -> Result<()> {
    let project_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // Config comes first; it owns the default log level (RUST_LOG still wins).
    let config = ProjectConfig::load(&project_root)?;
    init_tracing(config.log.level()?);

    info!("{} engine v{}", context::ENGINE_NAME, context::ENGINE_VERSION);
    info!(
        "loading project `{}` from {}",
        config.game.title,
        project_root.display()
    );

    let engine_context = Arc::new(EngineContext::new());
    engine_context.set_running(true);

    let result = run(&config, &project_root, &engine_context);

    engine_context.set_running(false);
    info!("engine stopped");

    result
}

fn run(config: &ProjectConfig, project_root: &Path, context: &Arc<EngineContext>) -> Result<()> {
    let host = Arc::new(EngineHost::new(Arc::clone(context)));
    let runtime = ScriptRuntime::new(host as Arc<dyn EngineApi>, config.scripting.max_operations);
    let mut objects = ScriptObjectManager::new();

    let script_path = config.entry_script_path(project_root);
    let player = objects
        .create_instance(&runtime, &script_path, "Player")
        .with_context(|| format!("loading player from {}", script_path.display()))?;

    player.call_method(&runtime, "talk", ("Hello!".to_string(),))?;

    Ok(())
}

fn init_tracing(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
