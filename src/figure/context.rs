//! The process-wide plot context.
//!
//! Figures accumulate here while a script runs, the way a pyplot-style
//! module keeps global state. Only the execution driver's critical section
//! touches it, and it is emptied before and after every attempt.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};

use super::types::FigureSet;

static PLOT_CONTEXT: Lazy<Mutex<FigureSet>> = Lazy::new(|| Mutex::new(FigureSet::new()));

/// Lock the shared figure set.
pub fn lock() -> MutexGuard<'static, FigureSet> {
    PLOT_CONTEXT.lock()
}

/// Number of figures currently held.
pub fn figure_count() -> usize {
    PLOT_CONTEXT.lock().len()
}

/// Remove every figure.
pub fn clear() {
    PLOT_CONTEXT.lock().clear();
}
