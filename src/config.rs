//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for the runner, supporting:
//! - Environment variables for all configurable values
//! - Defaults matching the behaviour clients of the run-code API expect
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CODEHUB_DEFAULT_PROMPT` | Prompt reported when `input()` was called without one | `Enter input:` |
//! | `CODEHUB_FIGURE_WIDTH` | Rendered figure width (pixels, 160..=4096) | `640` |
//! | `CODEHUB_FIGURE_HEIGHT` | Rendered figure height (pixels, 120..=4096) | `480` |
//! | `CODEHUB_SESSION_DIR` | Base directory for CLI artifact sessions | `/tmp/codehub-runner` |
//! | `CODEHUB_LOG` | Log filter (falls back to `RUST_LOG`) | `warn` |
//!
//! # Example
//!
//! ```bash
//! export CODEHUB_FIGURE_WIDTH=1024
//! export CODEHUB_FIGURE_HEIGHT=768
//! export CODEHUB_LOG=codehub_runner=debug
//! ```

use std::env;
use std::sync::OnceLock;

use crate::figure::render::{MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};

// ============================================================================
// Default Values
// ============================================================================

/// Prompt used when the script's `input()` call had no prompt text
pub const DEFAULT_PROMPT: &str = "Enter input:";

/// Default rendered figure width (pixels)
pub const DEFAULT_FIGURE_WIDTH: u32 = 640;

/// Default rendered figure height (pixels)
pub const DEFAULT_FIGURE_HEIGHT: u32 = 480;

/// Default session base directory
pub const DEFAULT_SESSION_DIR: &str = "/tmp/codehub-runner";

/// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_DEFAULT_PROMPT: &str = "CODEHUB_DEFAULT_PROMPT";
pub const ENV_FIGURE_WIDTH: &str = "CODEHUB_FIGURE_WIDTH";
pub const ENV_FIGURE_HEIGHT: &str = "CODEHUB_FIGURE_HEIGHT";
pub const ENV_SESSION_DIR: &str = "CODEHUB_SESSION_DIR";
pub const ENV_LOG: &str = "CODEHUB_LOG";

/// Standard filter variable, consulted when `CODEHUB_LOG` is unset
pub const ENV_RUST_LOG: &str = "RUST_LOG";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub execution: ExecutionSettings,
    pub figures: FigureSettings,
    pub session: SessionSettings,
    pub logging: LogSettings,
}

/// Execution-related settings
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    pub default_prompt: String,
}

/// Figure rendering settings
#[derive(Debug, Clone)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
}

/// Session-related settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base directory for session storage
    pub base_dir: String,
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive string
    pub filter: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self::from_lookup(|_| None)
    }

    /// Build from any key lookup; used by `from_env` and by tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_u32 = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            execution: ExecutionSettings {
                default_prompt: lookup(ENV_DEFAULT_PROMPT)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            },
            figures: FigureSettings {
                width: parse_u32(ENV_FIGURE_WIDTH, DEFAULT_FIGURE_WIDTH).clamp(MIN_WIDTH, MAX_WIDTH),
                height: parse_u32(ENV_FIGURE_HEIGHT, DEFAULT_FIGURE_HEIGHT)
                    .clamp(MIN_HEIGHT, MAX_HEIGHT),
            },
            session: SessionSettings {
                base_dir: lookup(ENV_SESSION_DIR)
                    .unwrap_or_else(|| DEFAULT_SESSION_DIR.to_string()),
            },
            logging: LogSettings {
                filter: lookup(ENV_LOG)
                    .or_else(|| lookup(ENV_RUST_LOG))
                    .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Get session base directory (convenience function)
pub fn session_base_dir() -> String {
    get().session.base_dir.clone()
}
