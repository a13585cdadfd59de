//! Request and outcome types shared by the driver, the wire encoder and the
//! replay client.

use serde::{Deserialize, Serialize};

/// One execution attempt as handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Full script text; evaluated from its first statement on every attempt
    pub script: String,

    /// Answers to earlier prompts, in the order they were given
    pub prior_answers: Vec<String>,

    /// Number of answers that earlier attempts already consumed
    pub cursor: usize,
}

impl ExecutionRequest {
    /// Build a request, checking `cursor <= prior_answers.len()`.
    pub fn new(
        script: impl Into<String>,
        prior_answers: Vec<String>,
        cursor: i64,
    ) -> Result<Self, RequestError> {
        let len = prior_answers.len();
        let cursor = usize::try_from(cursor)
            .ok()
            .filter(|c| *c <= len)
            .ok_or(RequestError::CursorOutOfRange { cursor, len })?;

        Ok(Self {
            script: script.into(),
            prior_answers,
            cursor,
        })
    }

    /// A first attempt: no answers yet.
    pub fn fresh(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            prior_answers: Vec::new(),
            cursor: 0,
        }
    }

    /// Replay every answer; the cursor sits at the end of the list.
    pub fn replaying(script: impl Into<String>, answers: Vec<String>) -> Self {
        let cursor = answers.len();
        Self {
            script: script.into(),
            prior_answers: answers,
            cursor,
        }
    }

    /// Answers that no earlier attempt has consumed yet.
    pub fn fresh_answers(&self) -> &[String] {
        &self.prior_answers[self.cursor.min(self.prior_answers.len())..]
    }

    pub fn is_blank(&self) -> bool {
        self.script.trim().is_empty()
    }
}

/// Result of one attempt. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The script ran to the end
    Completed {
        output: String,
        /// Base64-encoded PNG of the current figure, if any figure existed
        image: Option<String>,
    },

    /// The script asked for more input than was supplied
    Paused {
        prompt: String,
        output: String,
        next_cursor: usize,
    },

    /// The script raised an error
    Failed {
        output: String,
        error_kind: String,
        error_detail: String,
    },
}

impl ExecutionOutcome {
    /// Text the script printed during this attempt.
    pub fn output(&self) -> &str {
        match self {
            ExecutionOutcome::Completed { output, .. }
            | ExecutionOutcome::Paused { output, .. }
            | ExecutionOutcome::Failed { output, .. } => output,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, ExecutionOutcome::Paused { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionOutcome::Failed { .. })
    }

    /// Short label used in logs and the CLI summary.
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionOutcome::Completed { .. } => "completed",
            ExecutionOutcome::Paused { .. } => "paused",
            ExecutionOutcome::Failed { .. } => "failed",
        }
    }
}

/// Problems with a request that stop it before evaluation.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The body is not the expected JSON structure
    #[error("Invalid JSON")]
    Malformed(#[source] serde_json::Error),

    /// Nothing but whitespace to run
    #[error("Error: No code provided")]
    EmptyScript,

    /// `input_index` is negative or past the end of `inputs`
    #[error("input_index {cursor} is outside 0..={len}")]
    CursorOutOfRange { cursor: i64, len: usize },
}
