use std::fs;
use std::path::Path;
use std::sync::Arc;

use rhai::{AST, Dynamic, Engine, EvalAltResult, FuncArgs, Scope};
use tracing::{debug, info};

use crate::script::engine_module::{self, EngineApi};
use crate::script::error::ScriptError;

/// The embedded interpreter, configured once per host process.
///
/// Scripts see the host through the registered `engine` module. Their
/// `print`/`debug` built-ins land in the host log sink, and a per-run
/// operation budget keeps runaway scripts from hanging the host.
pub struct ScriptRuntime {
    engine: Engine,
}

impl ScriptRuntime {
    pub fn new(api: Arc<dyn EngineApi>, max_operations: u64) -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(max_operations);

        engine.on_print(|text| info!(target: "script", "{text}"));
        engine.on_debug(|text, source, pos| match source {
            Some(source) => debug!(target: "script", "[{source}] ({pos}) {text}"),
            None => debug!(target: "script", "({pos}) {text}"),
        });

        engine.register_static_module("engine", engine_module::engine_module(api).into());

        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run inline script source to completion.
    pub fn run(&self, source: &str) -> Result<(), ScriptError> {
        self.engine.run(source).map_err(ScriptError::from)
    }

    /// Evaluate a source expression and hand back its value.
    pub fn eval_expression(&self, source: &str) -> Result<Dynamic, ScriptError> {
        self.engine.eval::<Dynamic>(source).map_err(ScriptError::from)
    }

    /// Read and compile a script file. The AST carries the file path so
    /// runtime errors point at the right source.
    pub fn compile(&self, path: &Path) -> Result<AST, ScriptError> {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut ast = self
            .engine
            .compile(&source)
            .map_err(|source| ScriptError::Compile {
                path: path.to_path_buf(),
                source,
            })?;
        ast.set_source(path.to_string_lossy().into_owned());

        Ok(ast)
    }

    /// Call a top-level function defined by a compiled script. The result
    /// comes back as a [`Dynamic`] for the caller to cast.
    pub fn call_function(
        &self,
        ast: &AST,
        name: &str,
        args: impl FuncArgs,
    ) -> Result<Dynamic, ScriptError> {
        let mut scope = Scope::new();
        self.engine
            .call_fn::<Dynamic>(&mut scope, ast, name, args)
            .map_err(|err| match *err {
                EvalAltResult::ErrorFunctionNotFound(ref signature, _)
                    if signature.split(' ').next() == Some(name) =>
                {
                    ScriptError::FunctionNotFound {
                        name: name.to_string(),
                    }
                }
                _ => ScriptError::Runtime(err),
            })
    }
}
