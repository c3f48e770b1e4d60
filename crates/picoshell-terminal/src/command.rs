//! Command tree nodes and the handler/output seams.

use std::fmt;
use std::sync::Arc;

use picoshell_types::error::{Result, Severity};

/// A piece of output for the terminal. `severity` selects the `[SHELL] `
/// framing; `None` is printed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Option<Severity>,
    pub text: String,
}

impl Message {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            severity: None,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Some(Severity::Info),
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Some(Severity::Warning),
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Some(Severity::Error),
            text: text.into(),
        }
    }
}

/// Deferred output. Implemented by the message queue; handlers write here
/// instead of touching the terminal directly.
pub trait MessageSink: Send + Sync {
    fn post(&self, message: Message);

    /// Post text as-is. Include the trailing newline yourself.
    fn print(&self, text: &str) {
        self.post(Message::plain(text));
    }

    fn info(&self, text: &str) {
        self.post(Message::info(text));
    }

    fn warn(&self, text: &str) {
        self.post(Message::warning(text));
    }

    fn error(&self, text: &str) {
        self.post(Message::error(text));
    }
}

/// The callable attached to a leaf command.
///
/// `args` are the tokens left over after the command path was resolved, so
/// `led blink 3` hands `["3"]` to the `blink` handler.
pub trait CommandHandler: Send + Sync {
    fn execute(&self, args: &[&str], out: &dyn MessageSink) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[&str], &dyn MessageSink) -> Result<()> + Send + Sync,
{
    fn execute(&self, args: &[&str], out: &dyn MessageSink) -> Result<()> {
        self(args, out)
    }
}

/// A node in the command tree: a leaf with a handler, or an inner node with
/// subcommands. Structural rules are checked by
/// [`Registry::register`](crate::registry::Registry::register).
#[derive(Clone)]
pub struct Command {
    name: String,
    help: String,
    handler: Option<Arc<dyn CommandHandler>>,
    subcommands: Vec<Command>,
}

impl Command {
    /// A node with neither handler nor subcommands yet.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            handler: None,
            subcommands: Vec::new(),
        }
    }

    /// Attach a closure handler.
    pub fn with_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&[&str], &dyn MessageSink) -> Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    /// Attach an already shared handler.
    pub fn with_handler_object(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn with_subcommands(mut self, subcommands: Vec<Command>) -> Self {
        self.subcommands = subcommands;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn handler(&self) -> Option<&Arc<dyn CommandHandler>> {
        self.handler.as_ref()
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn has_children(&self) -> bool {
        !self.subcommands.is_empty()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("handler", &self.handler.is_some())
            .field("subcommands", &self.subcommands)
            .finish()
    }
}
