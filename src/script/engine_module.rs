use std::sync::Arc;

use rhai::{EvalAltResult, ImmutableString, Map, Module};
use tracing::info;

use crate::context::EngineContext;

/// Host capability surface exposed to scripts as the `engine` module.
///
/// Implementations must keep `get_version` side-effect free; `print_log`
/// emits exactly one line per call to whatever sink the host maintains.
pub trait EngineApi: Send + Sync {
    fn get_version(&self) -> String;
    fn print_log(&self, message: &str);
}

/// Production `EngineApi`: version from the engine context, log lines to the
/// tracing sink under the `script` target.
#[derive(Debug)]
pub struct EngineHost {
    context: Arc<EngineContext>,
}

impl EngineHost {
    pub fn new(context: Arc<EngineContext>) -> Self {
        Self { context }
    }
}

impl EngineApi for EngineHost {
    fn get_version(&self) -> String {
        self.context.engine_version().to_string()
    }

    fn print_log(&self, message: &str) {
        info!(target: "script", "{message}");
    }
}

/// Build the static `engine` module scripts call into.
///
/// `print_log` comes in two shapes: a plain text argument, and the
/// named-argument form `engine::print_log(#{ message: ... })` where the map
/// must hold exactly one `message` string.
pub fn engine_module(api: Arc<dyn EngineApi>) -> Module {
    let mut module = Module::new();

    let version_api = Arc::clone(&api);
    module.set_native_fn(
        "get_version",
        move || -> Result<ImmutableString, Box<EvalAltResult>> {
            Ok(version_api.get_version().into())
        },
    );

    let log_api = Arc::clone(&api);
    module.set_native_fn(
        "print_log",
        move |message: ImmutableString| -> Result<(), Box<EvalAltResult>> {
            log_api.print_log(&message);
            Ok(())
        },
    );

    let kwargs_api = api;
    module.set_native_fn(
        "print_log",
        move |args: Map| -> Result<(), Box<EvalAltResult>> {
            let message = parse_message_kwargs(&args)?;
            kwargs_api.print_log(&message);
            Ok(())
        },
    );

    module
}

fn parse_message_kwargs(args: &Map) -> Result<ImmutableString, Box<EvalAltResult>> {
    let mut message = None;
    for (key, value) in args {
        if key.as_str() != "message" {
            return Err(format!("print_log: unexpected named argument `{key}`").into());
        }
        message = Some(value.clone().try_cast::<ImmutableString>().ok_or_else(
            || -> Box<EvalAltResult> {
                format!("print_log: `message` must be a string, not {}", value.type_name()).into()
            },
        )?);
    }

    message.ok_or_else(|| -> Box<EvalAltResult> {
        "print_log: missing named argument `message`".into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::runtime::ScriptRuntime;
    use std::sync::Mutex;

    struct RecordingApi {
        version: Mutex<String>,
        logs: Mutex<Vec<String>>,
    }

    impl RecordingApi {
        fn new(version: &str) -> Arc<Self> {
            Arc::new(Self {
                version: Mutex::new(version.to_string()),
                logs: Mutex::new(Vec::new()),
            })
        }

        fn logs(&self) -> Vec<String> {
            self.logs.lock().unwrap().clone()
        }
    }

    impl EngineApi for RecordingApi {
        fn get_version(&self) -> String {
            self.version.lock().unwrap().clone()
        }

        fn print_log(&self, message: &str) {
            self.logs.lock().unwrap().push(message.to_string());
        }
    }

    fn runtime_with(api: Arc<RecordingApi>) -> ScriptRuntime {
        ScriptRuntime::new(api, 100_000)
    }

    #[test]
    fn version_reaches_scripts() {
        let api = RecordingApi::new("2.3.0");
        let runtime = runtime_with(Arc::clone(&api));

        let version = runtime
            .eval_expression("engine::get_version()")
            .unwrap()
            .try_cast::<ImmutableString>()
            .unwrap();

        assert_eq!(version, "2.3.0");
    }

    #[test]
    fn print_log_accepts_positional_text() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        runtime.run(r#"engine::print_log("direct text")"#).unwrap();

        assert_eq!(api.logs(), vec!["direct text".to_string()]);
    }

    #[test]
    fn print_log_accepts_named_message() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        runtime
            .run(r#"engine::print_log(#{ message: "named text" })"#)
            .unwrap();

        assert_eq!(api.logs(), vec!["named text".to_string()]);
    }

    #[test]
    fn print_log_dispatches_on_argument_type() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        runtime
            .run(
                r#"
engine::print_log("positional");
engine::print_log(#{ message: "named" });
"#,
            )
            .unwrap();

        assert_eq!(
            api.logs(),
            vec!["positional".to_string(), "named".to_string()]
        );
    }

    #[test]
    fn print_log_rejects_missing_message_key() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        let err = runtime.run("engine::print_log(#{})").unwrap_err();

        assert!(err.to_string().contains("missing named argument"));
        assert!(api.logs().is_empty());
    }

    #[test]
    fn print_log_rejects_non_string_message() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        let err = runtime
            .run("engine::print_log(#{ message: 42 })")
            .unwrap_err();

        assert!(err.to_string().contains("must be a string"));
        assert!(api.logs().is_empty());
    }

    #[test]
    fn print_log_rejects_unknown_named_argument() {
        let api = RecordingApi::new("1.0.0");
        let runtime = runtime_with(Arc::clone(&api));

        let err = runtime
            .run(r#"engine::print_log(#{ level: "warn", message: "x" })"#)
            .unwrap_err();

        assert!(err.to_string().contains("unexpected named argument"));
        assert!(api.logs().is_empty());
    }

    #[test]
    fn host_backed_api_reports_context_version() {
        let context = Arc::new(EngineContext::new());
        let host = EngineHost::new(Arc::clone(&context));

        assert_eq!(host.get_version(), context.engine_version());
    }
}
