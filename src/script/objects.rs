use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rhai::{AST, Dynamic, EvalAltResult, FnPtr, FuncArgs, Map, Scope};
use tracing::debug;

use crate::script::error::ScriptError;
use crate::script::runtime::ScriptRuntime;

/// Loads script files on demand and instantiates the classes they define.
///
/// Scripts model a class as a constructor function returning an object map
/// whose fields hold function pointers:
///
/// ```rhai
/// fn Player() {
///     #{ talk: Fn("Player_talk") }
/// }
/// ```
///
/// Compiled modules are cached by canonical path, so every instance created
/// from the same file shares one AST until [`invalidate`](Self::invalidate)
/// drops it, no matter how callers spell the path.
#[derive(Debug, Default)]
pub struct ScriptObjectManager {
    modules: HashMap<PathBuf, Arc<AST>>,
}

impl ScriptObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `path` and cache the result, or return the cached module.
    pub fn load_module(
        &mut self,
        runtime: &ScriptRuntime,
        path: &Path,
    ) -> Result<Arc<AST>, ScriptError> {
        let key = cache_key(path);
        if let Some(ast) = self.modules.get(&key) {
            return Ok(Arc::clone(ast));
        }

        debug!(path = %path.display(), "compiling script module");
        let ast = Arc::new(runtime.compile(path)?);
        self.modules.insert(key, Arc::clone(&ast));
        Ok(ast)
    }

    /// Instantiate `class_name` from the script at `path` by calling its
    /// constructor function.
    pub fn create_instance(
        &mut self,
        runtime: &ScriptRuntime,
        path: &Path,
        class_name: &str,
    ) -> Result<ScriptObject, ScriptError> {
        let ast = self.load_module(runtime, path)?;

        let mut scope = Scope::new();
        let fields = runtime
            .engine()
            .call_fn::<Map>(&mut scope, &ast, class_name, ())
            .map_err(|err| match *err {
                EvalAltResult::ErrorFunctionNotFound(ref signature, _)
                    if signature.split(' ').next() == Some(class_name) =>
                {
                    ScriptError::ClassNotFound {
                        class: class_name.to_string(),
                        path: path.to_path_buf(),
                    }
                }
                EvalAltResult::ErrorMismatchOutputType(..) => ScriptError::NotAnObject {
                    class: class_name.to_string(),
                },
                _ => ScriptError::Runtime(err),
            })?;

        Ok(ScriptObject {
            class_name: class_name.to_string(),
            ast,
            fields,
        })
    }

    /// Drop the cached module for `path`. Returns whether one was cached.
    /// The next load re-reads the file, which is how edits on disk take
    /// effect on running hosts. Accepts any spelling of the path, so
    /// watcher-reported absolute paths hit entries loaded relatively.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.modules.remove(&cache_key(path)).is_some()
    }

    pub fn invalidate_all(&mut self) {
        self.modules.clear();
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

// Relative spellings and the watcher's absolute paths must land on the same
// cache entry. Deleted files cannot canonicalize; keep their given path.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// A live script object: the constructor's field map plus the module it
/// came from. Methods stay callable after the manager invalidates the
/// module, since the object keeps its own handle on the AST.
#[derive(Debug)]
pub struct ScriptObject {
    class_name: String,
    ast: Arc<AST>,
    fields: Map,
}

impl ScriptObject {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn field(&self, name: &str) -> Option<&Dynamic> {
        self.fields.get(name)
    }

    /// Call a method on this object by looking up the function pointer
    /// stored under `method` in the field map. The result comes back as a
    /// [`Dynamic`] for the caller to cast.
    pub fn call_method(
        &self,
        runtime: &ScriptRuntime,
        method: &str,
        args: impl FuncArgs,
    ) -> Result<Dynamic, ScriptError> {
        let field = self
            .fields
            .get(method)
            .ok_or_else(|| ScriptError::MethodNotFound {
                class: self.class_name.clone(),
                method: method.to_string(),
            })?;

        let fn_ptr = field
            .clone()
            .try_cast::<FnPtr>()
            .ok_or_else(|| ScriptError::NotCallable {
                class: self.class_name.clone(),
                method: method.to_string(),
            })?;

        fn_ptr
            .call::<Dynamic>(runtime.engine(), &self.ast, args)
            .map_err(ScriptError::from)
    }
}
