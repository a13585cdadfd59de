//! Maps script-runtime errors onto the category names clients display.

use rhai::{EvalAltResult, ParseError};
use serde::{Deserialize, Serialize};

/// A script failure as reported to the caller: category plus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct ScriptFailure {
    pub kind: String,
    pub detail: String,
}

impl ScriptFailure {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// The script did not compile.
    pub fn from_parse(err: &ParseError) -> Self {
        Self::new("SyntaxError", err.to_string())
    }

    /// Classify an evaluation error, looking through function-call wrappers
    /// to the error that was actually raised.
    pub fn from_eval(err: &EvalAltResult) -> Self {
        let root = innermost(err);
        let detail = match root {
            EvalAltResult::ErrorRuntime(value, ..) => value.to_string(),
            EvalAltResult::ErrorArithmetic(message, ..) => message.clone(),
            other => other.to_string(),
        };
        Self::new(category(root), detail)
    }
}

fn innermost(err: &EvalAltResult) -> &EvalAltResult {
    match err {
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => innermost(inner),
        EvalAltResult::ErrorInModule(_, inner, _) => innermost(inner),
        other => other,
    }
}

fn category(err: &EvalAltResult) -> &'static str {
    match err {
        EvalAltResult::ErrorParsing(..) => "SyntaxError",
        EvalAltResult::ErrorArithmetic(message, ..) => {
            if message.starts_with("Division by zero") {
                "ZeroDivisionError"
            } else {
                "ArithmeticError"
            }
        }
        EvalAltResult::ErrorVariableNotFound(..)
        | EvalAltResult::ErrorFunctionNotFound(..)
        | EvalAltResult::ErrorModuleNotFound(..) => "NameError",
        EvalAltResult::ErrorPropertyNotFound(..) | EvalAltResult::ErrorDotExpr(..) => {
            "AttributeError"
        }
        EvalAltResult::ErrorMismatchDataType(..)
        | EvalAltResult::ErrorMismatchOutputType(..)
        | EvalAltResult::ErrorIndexingType(..)
        | EvalAltResult::ErrorFor(..) => "TypeError",
        EvalAltResult::ErrorArrayBounds(..) | EvalAltResult::ErrorStringBounds(..) => {
            "IndexError"
        }
        EvalAltResult::ErrorIndexNotFound(..) => "KeyError",
        EvalAltResult::ErrorStackOverflow(..) => "RecursionError",
        EvalAltResult::ErrorTooManyOperations(..) | EvalAltResult::ErrorTooManyModules(..) => {
            "ResourceLimitError"
        }
        EvalAltResult::ErrorDataTooLarge(..) => "MemoryError",
        _ => "RuntimeError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::{Engine, OptimizationLevel};

    fn run(script: &str) -> ScriptFailure {
        let mut engine = Engine::new();
        engine.set_optimization_level(OptimizationLevel::None);
        match engine.compile(script) {
            Err(err) => ScriptFailure::from_parse(&err),
            Ok(ast) => {
                let err = engine.run_ast(&ast).expect_err("script should fail");
                ScriptFailure::from_eval(&err)
            }
        }
    }

    #[test]
    fn test_division_by_zero() {
        let failure = run("1/0");
        assert_eq!(failure.kind, "ZeroDivisionError");
        assert!(failure.detail.to_lowercase().contains("division"));
    }

    #[test]
    fn test_syntax_error() {
        assert_eq!(run("let = ;").kind, "SyntaxError");
    }

    #[test]
    fn test_unknown_variable() {
        assert_eq!(run("print(missing)").kind, "NameError");
    }

    #[test]
    fn test_thrown_value_is_detail() {
        let failure = run(r#"throw "boom""#);
        assert_eq!(failure, ScriptFailure::new("RuntimeError", "boom"));
    }

    #[test]
    fn test_error_inside_function_is_unwrapped() {
        let failure = run("fn f(x) { x / 0 } f(3)");
        assert_eq!(failure.kind, "ZeroDivisionError");
    }

    #[test]
    fn test_array_bounds() {
        assert_eq!(run("let a = [1]; a[5]").kind, "IndexError");
    }

    #[test]
    fn test_display_joins_kind_and_detail() {
        let failure = ScriptFailure::new("TypeError", "bad operand");
        assert_eq!(failure.to_string(), "TypeError: bad operand");
    }
}
