//! Replacement for interactive line input: answers come from a list supplied
//! with the request instead of a terminal.

/// Raised when the script asks for a line and no supplied answer is left.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("input required for prompt {prompt:?}")]
pub struct InputExhausted {
    /// Prompt text the script passed to `input`
    pub prompt: String,
}

/// Feeds prior answers back to the script in the order they were given.
#[derive(Debug, Clone)]
pub struct InputShim {
    answers: Vec<String>,
    cursor: usize,
    last_prompt: Option<String>,
    exhausted: bool,
}

impl InputShim {
    /// Replay always begins with the first answer because the script is
    /// re-evaluated from its first statement.
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            answers,
            cursor: 0,
            last_prompt: None,
            exhausted: false,
        }
    }

    /// Answer one `input(prompt)` call.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, InputExhausted> {
        self.last_prompt = Some(prompt.to_string());

        match self.answers.get(self.cursor) {
            Some(answer) => {
                self.cursor += 1;
                Ok(answer.clone())
            }
            None => {
                self.exhausted = true;
                Err(InputExhausted {
                    prompt: prompt.to_string(),
                })
            }
        }
    }

    /// Number of answers handed out so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Most recent prompt, whether or not it was answered.
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// True once a prompt went unanswered during this attempt.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn remaining(&self) -> usize {
        self.answers.len() - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_in_order_then_exhausts() {
        let mut shim = InputShim::new(vec!["one".into(), "two".into()]);
        assert_eq!(shim.read_line("a? ").unwrap(), "one");
        assert_eq!(shim.read_line("b? ").unwrap(), "two");
        assert_eq!(shim.cursor(), 2);
        assert!(!shim.is_exhausted());

        let err = shim.read_line("c? ").unwrap_err();
        assert_eq!(err.prompt, "c? ");
        assert!(shim.is_exhausted());
        assert_eq!(shim.cursor(), 2);
    }

    #[test]
    fn test_last_prompt_recorded_even_when_answered() {
        let mut shim = InputShim::new(vec!["x".into()]);
        assert_eq!(shim.last_prompt(), None);
        shim.read_line("first").unwrap();
        assert_eq!(shim.last_prompt(), Some("first"));
        assert_eq!(shim.remaining(), 0);
    }

    #[test]
    fn test_empty_list_exhausts_immediately() {
        let mut shim = InputShim::new(Vec::new());
        assert!(shim.read_line("").is_err());
        assert_eq!(shim.last_prompt(), Some(""));
    }
}
