//! Script runtime: a Rhai engine wired to one capture session.
//!
//! The engine built here is the only thing a script can reach:
//! - `print(x)` goes to the session's [`OutputSink`](crate::capture::OutputSink)
//! - `debug(x)` goes to the log, never to captured output
//! - `input()` / `input(prompt)` read from the session's [`InputShim`](crate::capture::InputShim)
//! - the plotting functions in [`plot_api`] draw into the shared plot context
//!
//! An engine is built per attempt and dropped with it.

pub mod errors;
pub mod plot_api;

use rhai::{Dynamic, Engine, EvalAltResult, ImmutableString, OptimizationLevel, Position, Scope};

use crate::capture::{InputExhausted, SharedSession};
pub use errors::ScriptFailure;

/// Build an engine whose I/O is bound to `session`.
pub fn build_engine(session: &SharedSession) -> Engine {
    let mut engine = Engine::new();
    // run the script exactly as written; replay relies on every side effect
    // happening in source order
    engine.set_optimization_level(OptimizationLevel::None);

    let sink = session.clone();
    engine.on_print(move |text| sink.borrow_mut().output.write_line(text));
    engine.on_debug(|text, source, pos| {
        tracing::debug!(target: "script", source = source.unwrap_or(""), %pos, "{text}");
    });

    let shim = session.clone();
    engine.register_fn(
        "input",
        move |prompt: ImmutableString| -> Result<String, Box<EvalAltResult>> {
            shim.borrow_mut()
                .input
                .read_line(prompt.as_str())
                .map_err(exhausted_to_eval)
        },
    );
    let shim = session.clone();
    engine.register_fn("input", move || -> Result<String, Box<EvalAltResult>> {
        shim.borrow_mut()
            .input
            .read_line("")
            .map_err(exhausted_to_eval)
    });

    plot_api::register(&mut engine);
    engine
}

/// Compile and run `script` in a fresh scope.
pub fn run(engine: &Engine, script: &str) -> Result<(), ScriptError> {
    let ast = engine.compile(script).map_err(|err| ScriptError::Parse(Box::new(err)))?;
    let mut scope = Scope::new();
    engine
        .run_ast_with_scope(&mut scope, &ast)
        .map_err(ScriptError::Eval)
}

/// Why a script stopped early
#[derive(Debug)]
pub enum ScriptError {
    Parse(Box<rhai::ParseError>),
    Eval(Box<EvalAltResult>),
}

impl ScriptError {
    pub fn failure(&self) -> ScriptFailure {
        match self {
            ScriptError::Parse(err) => ScriptFailure::from_parse(err),
            ScriptError::Eval(err) => ScriptFailure::from_eval(err),
        }
    }
}

// Termination cannot be caught by a script's try/catch, so the prompt always
// reaches the driver.
fn exhausted_to_eval(exhausted: InputExhausted) -> Box<EvalAltResult> {
    EvalAltResult::ErrorTerminated(Dynamic::from(exhausted.prompt), Position::NONE).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureSession;

    #[test]
    fn test_print_is_captured() {
        let session = CaptureSession::shared(vec![]);
        let engine = build_engine(&session);
        run(&engine, r#"print("a"); print(1 + 2);"#).unwrap();
        assert_eq!(session.borrow().output.captured(), "a\n3\n");
    }

    #[test]
    fn test_debug_is_not_captured() {
        let session = CaptureSession::shared(vec![]);
        let engine = build_engine(&session);
        run(&engine, r#"debug("hidden"); print("shown");"#).unwrap();
        assert_eq!(session.borrow().output.captured(), "shown\n");
    }

    #[test]
    fn test_input_reads_answers() {
        let session = CaptureSession::shared(vec!["7".into()]);
        let engine = build_engine(&session);
        run(&engine, r#"let n = input("n? ").parse_int(); print(n * 2);"#).unwrap();
        assert_eq!(session.borrow().output.captured(), "14\n");
        assert_eq!(session.borrow().input.cursor(), 1);
    }

    #[test]
    fn test_exhaustion_cannot_be_caught() {
        let session = CaptureSession::shared(vec![]);
        let engine = build_engine(&session);
        let result = run(
            &engine,
            r#"try { input("q: "); } catch (e) { print("swallowed"); } print("after");"#,
        );
        assert!(matches!(result, Err(ScriptError::Eval(_))));
        let session = session.borrow();
        assert!(session.input.is_exhausted());
        assert_eq!(session.input.last_prompt(), Some("q: "));
        assert_eq!(session.output.captured(), "");
    }

    #[test]
    fn test_parse_error() {
        let session = CaptureSession::shared(vec![]);
        let engine = build_engine(&session);
        let err = run(&engine, "let = ;").unwrap_err();
        assert_eq!(err.failure().kind, "SyntaxError");
    }
}
