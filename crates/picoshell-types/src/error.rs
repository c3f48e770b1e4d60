//! Error types for picoshell.

use std::io;

/// Reasons the tokenizer rejects a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// An opening quote was never closed.
    #[error("unclosed quote")]
    UnclosedQuote,

    /// A closing quote was followed by something other than a space.
    #[error("no space after quote")]
    NoSpaceAfterQuote,

    /// The line holds more tokens than the configured bound.
    #[error("too many tokens")]
    TooManyTokens,
}

/// How a shell message is framed on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Errors produced by the shell.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("commands already registered")]
    AlreadyRegistered,

    #[error("shell already started")]
    AlreadyStarted,

    #[error("no commands to register")]
    NoCommands,

    #[error("invalid command tree: {0}")]
    InvalidTree(String),

    #[error("invalid input: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{name}: subcommand not found")]
    SubcommandNotFound {
        /// The token that failed to resolve.
        name: String,
        /// The path resolved so far.
        parent: String,
    },

    #[error("incomplete command: '{0}'")]
    Incomplete(String),

    #[error("no help entry for '{0}'")]
    NoHelpEntry(String),

    #[error("command handler is being executed")]
    Busy,

    #[error("failed to add item to command queue")]
    JobQueueFull,

    #[error("command worker is not running")]
    WorkerGone,

    #[error("failed to allocate memory for sorted commands")]
    OutOfMemory,

    #[error("command error: {0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ShellError {
    /// Resolution problems are warnings; everything else is an error.
    pub fn severity(&self) -> Severity {
        match self {
            Self::CommandNotFound(_)
            | Self::SubcommandNotFound { .. }
            | Self::Incomplete(_)
            | Self::NoHelpEntry(_)
            | Self::Busy => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Follow-up line telling the user where to look next, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::CommandNotFound(_) => {
                Some("type 'help' for a list of available commands".to_string())
            },
            Self::SubcommandNotFound { parent, .. } | Self::Incomplete(parent) => Some(format!(
                "type 'help {parent}' for a list of available subcommands"
            )),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
