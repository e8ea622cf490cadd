use std::path::PathBuf;

use rhai::EvalAltResult;
use thiserror::Error;

/// Failures crossing the host/script boundary.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile script {}: {source}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: rhai::ParseError,
    },

    #[error("script function `{name}` not found")]
    FunctionNotFound { name: String },

    #[error("class `{class}` not found in {}", path.display())]
    ClassNotFound { class: String, path: PathBuf },

    #[error("constructor `{class}` did not return an object map")]
    NotAnObject { class: String },

    #[error("`{class}` has no method `{method}`")]
    MethodNotFound { class: String, method: String },

    #[error("`{class}.{method}` is not callable")]
    NotCallable { class: String, method: String },

    #[error("failed to watch scripts: {0}")]
    Watch(#[from] notify::Error),

    #[error("script runtime error: {0}")]
    Runtime(#[from] Box<EvalAltResult>),
}
