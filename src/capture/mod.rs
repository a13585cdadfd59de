//! Per-attempt capture state: the output sink and the input shim.
//!
//! A [`CaptureSession`] lives exactly as long as one execution attempt. The
//! script runtime holds a [`SharedSession`] while the script runs; when the
//! attempt ends the engine is dropped and the session is the only owner left.

pub mod input;
pub mod output;

use std::cell::RefCell;
use std::rc::Rc;

pub use input::{InputExhausted, InputShim};
pub use output::OutputSink;

/// Handle shared between the driver and the script callbacks.
pub type SharedSession = Rc<RefCell<CaptureSession>>;

/// Output buffer and answer cursor for one attempt.
#[derive(Debug)]
pub struct CaptureSession {
    pub output: OutputSink,
    pub input: InputShim,
}

impl CaptureSession {
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            output: OutputSink::new(),
            input: InputShim::new(answers),
        }
    }

    pub fn shared(answers: Vec<String>) -> SharedSession {
        Rc::new(RefCell::new(Self::new(answers)))
    }
}
