//! In-memory sink for the text a script prints during one attempt.

/// Captured script output.
///
/// The buffer starts empty on every attempt; replayed prints rebuild it from
/// scratch rather than appending to a previous attempt's text.
#[derive(Debug, Default, Clone)]
pub struct OutputSink {
    buffer: String,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one printed line (a trailing newline is added).
    pub fn write_line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Everything written so far. Valid after a pause or failure too.
    pub fn captured(&self) -> &str {
        &self.buffer
    }
}
