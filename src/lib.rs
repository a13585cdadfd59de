//! codehub-runner - replay-based script execution with captured output,
//! interactive input and plot images.
//!
//! This crate provides:
//! - An execution driver that runs a script from its first statement on every
//!   attempt, replaying earlier input answers in order
//! - Output capture and an input shim bound to a per-attempt Rhai engine
//! - A small plotting API whose current figure is returned as base64 PNG
//! - The JSON wire format of the run-code API
//! - A replay client and artifact sessions for the command line
//!
//! # Example
//!
//! ```rust,no_run
//! use codehub_runner::{ExecutionOutcome, ExecutionRequest, Executor};
//!
//! let script = r#"let name = input("Name: "); print(`Hello ${name}`);"#;
//! let executor = Executor::default();
//!
//! let first = executor.execute(&ExecutionRequest::fresh(script));
//! assert!(matches!(first, ExecutionOutcome::Paused { .. }));
//!
//! let second = executor.execute(&ExecutionRequest::replaying(script, vec!["Ada".into()]));
//! assert_eq!(second.output(), "Hello Ada\n");
//! ```

pub mod capture;
pub mod config;
pub mod executor;
pub mod figure;
pub mod runner;
pub mod script;
pub mod session;
pub mod types;
pub mod wire;

// Re-export the execution API
pub use executor::{Executor, ExecutorSettings, execute};
pub use types::{ExecutionOutcome, ExecutionRequest, RequestError};

// Re-export capture types
pub use capture::{CaptureSession, InputExhausted, InputShim, OutputSink};

// Re-export figure capture
pub use figure::{ArtifactCapture, ArtifactError};

// Re-export script failures
pub use script::ScriptFailure;

// Re-export wire format
pub use wire::{RunCodeRequest, RunCodeResponse, WireResponse, decode_request, encode_outcome, handle_run_code};

// Re-export replay client and sessions
pub use runner::{AnswerSource, RunTranscript, ScriptedAnswers, StepRecord, run_to_completion};
pub use session::{Session, SessionError};
