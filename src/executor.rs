//! Execution driver: one attempt, one outcome.
//!
//! Each call re-evaluates the whole script from its first statement with a
//! fresh engine and scope. Only the input answers carry over between calls,
//! so a script that paused on a prompt "resumes" by replaying every earlier
//! answer in order until it reaches the first unanswered prompt.
//!
//! ```text
//! Running ──▶ Completed { output, image }
//!    │
//!    ├──────▶ Paused    { prompt, output, next_cursor }
//!    │
//!    └──────▶ Failed    { output, error_kind, error_detail }
//! ```

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::capture::CaptureSession;
use crate::config::{self, Config};
use crate::figure::ArtifactCapture;
use crate::script;
use crate::types::{ExecutionOutcome, ExecutionRequest};

/// Serialises attempts across threads. The plot context is process-wide, so
/// setup, evaluation, artifact capture and cleanup form one critical section.
pub(crate) static EXECUTION_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Settings the driver needs for each attempt
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Prompt reported when the script called `input()` without one
    pub default_prompt: String,
    /// Rendered figure width in pixels
    pub figure_width: u32,
    /// Rendered figure height in pixels
    pub figure_height: u32,
}

impl ExecutorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_prompt: config.execution.default_prompt.clone(),
            figure_width: config.figures.width,
            figure_height: config.figures.height,
        }
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from_config(&Config::defaults())
    }
}

/// Runs execution attempts
#[derive(Debug, Clone, Default)]
pub struct Executor {
    settings: ExecutorSettings,
}

impl Executor {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self { settings }
    }

    /// Executor configured from the process environment
    pub fn from_env() -> Self {
        Self::new(ExecutorSettings::from_config(config::get()))
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Run one attempt of `request.script`, replaying `request.prior_answers`.
    pub fn execute(&self, request: &ExecutionRequest) -> ExecutionOutcome {
        let span = tracing::info_span!(
            "execute",
            answers = request.prior_answers.len(),
            cursor = request.cursor
        );
        let _entered = span.enter();

        let _exclusive = EXECUTION_LOCK.lock();
        let artifacts = ArtifactCapture::begin(self.settings.figure_width, self.settings.figure_height);
        let session = CaptureSession::shared(request.prior_answers.clone());

        tracing::debug!(
            fresh = request.fresh_answers().len(),
            "replaying answers from the first prompt"
        );

        let result = {
            let engine = script::build_engine(&session);
            script::run(&engine, &request.script)
        };

        let session = session.borrow();
        let output = session.output.captured().to_string();

        let outcome = match result {
            Ok(()) => {
                let unused = session.input.remaining();
                if unused > 0 {
                    tracing::debug!(unused, "script finished with answers left over");
                }
                match artifacts.collect() {
                    Ok(image) => ExecutionOutcome::Completed { output, image },
                    Err(err) => {
                        tracing::warn!(error = %err, "figure rendering failed");
                        ExecutionOutcome::Failed {
                            output,
                            error_kind: "ImageRenderError".to_string(),
                            error_detail: err.to_string(),
                        }
                    }
                }
            }
            Err(_) if session.input.is_exhausted() => {
                let prompt = session
                    .input
                    .last_prompt()
                    .filter(|p| !p.is_empty())
                    .unwrap_or(self.settings.default_prompt.as_str())
                    .to_string();
                ExecutionOutcome::Paused {
                    prompt,
                    output,
                    next_cursor: session.input.cursor(),
                }
            }
            Err(err) => {
                let failure = err.failure();
                tracing::debug!(kind = %failure.kind, detail = %failure.detail, "script failed");
                ExecutionOutcome::Failed {
                    output,
                    error_kind: failure.kind,
                    error_detail: failure.detail,
                }
            }
        };

        tracing::info!(outcome = outcome.label(), output_len = outcome.output().len(), "attempt finished");
        outcome
    }
}

/// Run one attempt with settings from the environment.
pub fn execute(request: &ExecutionRequest) -> ExecutionOutcome {
    Executor::from_env().execute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::context;
    use crate::figure::render::MAX_WIDTH;
    use base64::Engine;
    use pretty_assertions::assert_eq;

    fn run(script: &str, answers: &[&str]) -> ExecutionOutcome {
        let answers = answers.iter().map(|s| s.to_string()).collect();
        Executor::default().execute(&ExecutionRequest::replaying(script, answers))
    }

    #[test]
    fn test_completed_output() {
        assert_eq!(
            run(r#"print("hi")"#, &[]),
            ExecutionOutcome::Completed {
                output: "hi\n".to_string(),
                image: None
            }
        );
    }

    #[test]
    fn test_paused_on_missing_answer() {
        let script = r#"print("start"); let a = input("A: "); print(a); let b = input("B: ");"#;
        assert_eq!(
            run(script, &["x"]),
            ExecutionOutcome::Paused {
                prompt: "B: ".to_string(),
                output: "start\nx\n".to_string(),
                next_cursor: 1,
            }
        );
    }

    #[test]
    fn test_default_prompt_when_none_given() {
        match run("let a = input();", &[]) {
            ExecutionOutcome::Paused { prompt, .. } => assert_eq!(prompt, "Enter input:"),
            other => panic!("expected pause, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_keeps_partial_output() {
        match run(r#"print("before"); let x = 1 / 0; print("after");"#, &[]) {
            ExecutionOutcome::Failed {
                output,
                error_kind,
                error_detail,
            } => {
                assert_eq!(output, "before\n");
                assert_eq!(error_kind, "ZeroDivisionError");
                assert!(error_detail.to_lowercase().contains("division"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_completed_with_figure_has_image() {
        let outcome = run("plot([1, 4, 9]);", &[]);
        match outcome {
            ExecutionOutcome::Completed { image, .. } => assert!(image.is_some()),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_no_figures_survive_an_attempt() {
        let executor = Executor::default();
        for script in ["plot([1, 2]);", "plot([1, 2]); input(\"q\");", "plot([1]); 1 / 0;"] {
            executor.execute(&ExecutionRequest::fresh(script));
            let _guard = EXECUTION_LOCK.lock();
            assert_eq!(context::figure_count(), 0, "figures leaked after {script:?}");
        }
    }

    #[test]
    fn test_script_state_does_not_survive() {
        let executor = Executor::default();
        executor.execute(&ExecutionRequest::fresh("let leaked = 5;"));
        let outcome = executor.execute(&ExecutionRequest::fresh("print(leaked);"));
        match outcome {
            ExecutionOutcome::Failed { error_kind, .. } => assert_eq!(error_kind, "NameError"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_figure_settings_do_not_panic() {
        let executor = Executor::new(ExecutorSettings {
            figure_width: u32::MAX,
            figure_height: 200,
            ..ExecutorSettings::default()
        });
        match executor.execute(&ExecutionRequest::fresh("plot([1, 2]);")) {
            ExecutionOutcome::Completed { image: Some(image), .. } => {
                let png = base64::engine::general_purpose::STANDARD.decode(image).unwrap();
                let decoded = image::load_from_memory(&png).unwrap();
                assert_eq!((decoded.width(), decoded.height()), (MAX_WIDTH, 200));
            }
            other => panic!("expected a clamped image, got {other:?}"),
        }
    }

    #[test]
    fn test_most_recent_figure_is_rendered() {
        let script = "figure(); plot([1, 2, 3]); figure(); bar([4, 4]);";
        let image = match run(script, &[]) {
            ExecutionOutcome::Completed { image: Some(image), .. } => image,
            other => panic!("expected completion with image, got {other:?}"),
        };
        let png = base64::engine::general_purpose::STANDARD.decode(image).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (640, 480));

        // inside the first bar of the bar figure; the line figure leaves this pixel white
        assert_eq!(decoded.get_pixel(208, 236).0, [31, 119, 180]);
    }
}
