//! Artifact sessions for the command-line runner.
//!
//! Provides organized storage for what a CLI run produces:
//! - Unique session directories under the configured base location
//! - The rendered figure as `figure.png` and the replay transcript as JSON
//! - Automatic cleanup unless explicitly preserved

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;

use crate::config;
use crate::runner::RunTranscript;

/// File name of the decoded figure
pub const FIGURE_FILE: &str = "figure.png";

/// File name of the replay transcript
pub const TRANSCRIPT_FILE: &str = "transcript.json";

/// Errors from reading or writing session artifacts
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize transcript: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A directory holding the artifacts of one run.
///
/// The session owns its directory: dropping it removes the directory unless
/// `keep` is set.
#[derive(Debug)]
pub struct Session {
    /// Unique session ID
    pub id: String,
    /// Root directory for this session
    pub dir: PathBuf,
    /// Whether to keep files after session ends
    pub keep: bool,
}

impl Session {
    /// Create a session named after the script file, under the configured base directory
    pub fn with_name(name: &str) -> Self {
        Self::with_name_in(config::session_base_dir(), name)
    }

    /// Create a named session under an explicit base directory
    pub fn with_name_in(base: impl AsRef<Path>, name: &str) -> Self {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let id = format!("{}_{}_{}", sanitize_name(name), timestamp, std::process::id());
        let dir = base.as_ref().join(&id);

        Self {
            id,
            dir,
            keep: false,
        }
    }

    /// Use a caller-chosen directory; such directories are kept by default
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let id = dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "session".to_string());

        Self {
            id,
            dir,
            keep: true,
        }
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    /// Create the directory and write session metadata
    pub fn init(&self) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir)?;

        let metadata = serde_json::json!({
            "id": self.id,
            "created": chrono::Utc::now().to_rfc3339(),
        });
        fs::write(
            self.dir.join(".session.json"),
            serde_json::to_string_pretty(&metadata)?,
        )?;
        Ok(())
    }

    /// Decode a base64 PNG and write it as `figure.png`
    pub fn write_image(&self, encoded: &str) -> Result<PathBuf, SessionError> {
        let png = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        let path = self.dir.join(FIGURE_FILE);
        fs::write(&path, png)?;
        Ok(path)
    }

    /// Write the transcript as pretty JSON
    pub fn write_transcript(&self, transcript: &RunTranscript) -> Result<PathBuf, SessionError> {
        let path = self.dir.join(TRANSCRIPT_FILE);
        fs::write(&path, serde_json::to_string_pretty(transcript)?)?;
        Ok(path)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}

/// Sanitize a name for use in directory names
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
