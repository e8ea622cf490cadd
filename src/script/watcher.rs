use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::script::error::ScriptError;

const SCRIPT_EXTENSION: &str = "rhai";

/// A script file changed on disk. The receiver is expected to invalidate
/// the module so the next load picks up the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Changed(PathBuf),
}

/// Watches a scripts directory and reports edits to `.rhai` files over a
/// channel. Watching stops when the value is dropped.
pub struct ScriptWatcher {
    _watcher: RecommendedWatcher,
}

impl ScriptWatcher {
    pub fn watch(
        scripts_dir: &Path,
        tx: mpsc::Sender<ScriptEvent>,
    ) -> Result<Self, ScriptError> {
        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(err) => {
                        warn!("script watcher error: {err}");
                        return;
                    }
                };

                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }

                for path in event.paths {
                    if !is_script_path(&path) {
                        continue;
                    }
                    debug!(path = %path.display(), "script changed on disk");
                    // The receiver may be gone during shutdown.
                    let _ = tx.send(ScriptEvent::Changed(path));
                }
            })?;

        watcher.watch(scripts_dir, RecursiveMode::Recursive)?;

        Ok(Self { _watcher: watcher })
    }
}

fn is_script_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn only_script_paths_are_watched() {
        assert!(is_script_path(Path::new("assets/scripts/game.rhai")));
        assert!(!is_script_path(Path::new("assets/scripts/notes.txt")));
        assert!(!is_script_path(Path::new("assets/scripts/rhai")));
    }

    #[test]
    fn reports_edits_to_script_files() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let _watcher = ScriptWatcher::watch(dir.path(), tx).unwrap();

        fs::write(dir.path().join("notes.txt"), "not a script").unwrap();
        let script = dir.path().join("game.rhai");
        fs::write(&script, "fn Player() { #{} }").unwrap();

        let ScriptEvent::Changed(path) = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(is_script_path(&path));
        assert_eq!(path.file_name().unwrap(), "game.rhai");
    }

    #[test]
    fn dropping_the_watcher_stops_events() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let watcher = ScriptWatcher::watch(dir.path(), tx).unwrap();
        drop(watcher);

        fs::write(dir.path().join("game.rhai"), "fn Player() { #{} }").unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
