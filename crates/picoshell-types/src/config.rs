//! Shell configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};

/// Which escape-code table the terminal speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    /// Full VT100 styling (colors, bold).
    #[default]
    Vt100,
    /// Cursor movement only, no styling.
    Plain,
}

/// Tunables for a shell instance. Every field has a default, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Maximum number of bytes in the input line.
    pub max_line_length: usize,
    /// Maximum number of tokens a line may split into.
    pub max_tokens: usize,
    /// Number of reachable history entries. Zero disables history.
    pub history_size: usize,
    /// Capacity of the terminal message queue.
    pub message_queue_size: usize,
    /// Idle delay of the terminal loop.
    pub poll_interval_ms: u64,
    /// Byte read timeout while polling for input.
    pub read_timeout_us: u64,
    /// Per-byte timeout while decoding an escape sequence.
    pub escape_timeout_us: u64,
    pub prompt: String,
    pub terminal: TerminalKind,
    /// Post "entering/leaving command handler" around each job.
    pub announce_handlers: bool,
}

const DEFAULT_LINE_LENGTH: usize = 128;

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_LINE_LENGTH,
            max_tokens: DEFAULT_LINE_LENGTH / 5,
            history_size: 10,
            message_queue_size: 16,
            poll_interval_ms: 50,
            read_timeout_us: 10,
            escape_timeout_us: 1000,
            prompt: "shell:~$ ".to_string(),
            terminal: TerminalKind::Vt100,
            announce_handlers: true,
        }
    }
}

impl ShellConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a TOML file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded shell config from {}", path.display());
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            return Err(ShellError::Config(
                "max_line_length must be non-zero".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ShellError::Config("max_tokens must be non-zero".into()));
        }
        if self.message_queue_size == 0 {
            return Err(ShellError::Config(
                "message_queue_size must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// History is available only with a non-zero size.
    pub fn history_enabled(&self) -> bool {
        self.history_size > 0
    }
}
