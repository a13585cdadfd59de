//! Replay client: drive a script through pauses until it finishes.
//!
//! After every pause the script is submitted again with one more answer in
//! the list, the same way a browser client would re-post the form.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::executor::Executor;
use crate::types::{ExecutionOutcome, ExecutionRequest};

/// Supplies answers when a script pauses on a prompt
pub trait AnswerSource {
    /// Answer `prompt`, or `None` to stop replaying. `output_so_far` is the
    /// full output of the attempt that paused.
    fn answer(&mut self, prompt: &str, output_so_far: &str) -> Option<String>;
}

/// Answers from a fixed list, in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    queue: VecDeque<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl AnswerSource for ScriptedAnswers {
    fn answer(&mut self, _prompt: &str, _output_so_far: &str) -> Option<String> {
        self.queue.pop_front()
    }
}

/// One answered prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number
    pub step: usize,

    /// Prompt the script paused on
    pub prompt: String,

    /// Answer that was supplied
    pub answer: String,
}

/// Everything that happened while replaying one script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTranscript {
    pub started_at: DateTime<Utc>,

    /// Number of execution attempts made
    pub attempts: usize,

    pub steps: Vec<StepRecord>,

    /// Outcome of the last attempt. `Paused` only when the source ran out.
    pub outcome: ExecutionOutcome,
}

impl RunTranscript {
    pub fn answers(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.answer.clone()).collect()
    }

    /// True unless the source stopped answering before the script finished
    pub fn finished(&self) -> bool {
        !self.outcome.is_paused()
    }
}

/// Re-run `script` until it completes, fails, or `source` stops answering.
pub fn run_to_completion(
    executor: &Executor,
    script: &str,
    source: &mut dyn AnswerSource,
) -> RunTranscript {
    let started_at = Utc::now();
    let mut answers: Vec<String> = Vec::new();
    let mut steps = Vec::new();
    let mut attempts = 0;

    loop {
        let request = ExecutionRequest::replaying(script, answers.clone());
        let outcome = executor.execute(&request);
        attempts += 1;

        let ExecutionOutcome::Paused {
            prompt,
            output,
            next_cursor,
        } = outcome.clone()
        else {
            return RunTranscript {
                started_at,
                attempts,
                steps,
                outcome,
            };
        };

        debug_assert_eq!(next_cursor, answers.len());
        let Some(answer) = source.answer(&prompt, &output) else {
            tracing::info!(attempts, prompt = %prompt, "answer source exhausted");
            return RunTranscript {
                started_at,
                attempts,
                steps,
                outcome,
            };
        };

        tracing::debug!(step = steps.len() + 1, prompt = %prompt, "answered prompt");
        steps.push(StepRecord {
            step: steps.len() + 1,
            prompt,
            answer: answer.clone(),
        });
        answers.push(answer);
    }
}
