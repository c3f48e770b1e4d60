//! Line editor and command dispatch.
//!
//! The terminal side of the shell is single-threaded. Raw bytes are fed one
//! at a time into a [`LineEditor`], which keeps the editable line, decodes
//! escape sequences, completes names on Tab, and on Enter tokenizes the line,
//! resolves it against the registered command tree and hands the resulting
//! job to a [`Dispatcher`]. Running the job is somebody else's business.

pub mod buffer;
pub mod command;
pub mod completion;
pub mod console;
pub mod editor;
pub mod escape;
pub mod help;
#[cfg(feature = "history")]
pub mod history;
pub mod profile;
pub mod registry;
pub mod tokenizer;

/// The single live editable line.
pub use buffer::InputBuffer;
/// A node of the command tree.
pub use command::Command;
/// Callable attached to a leaf command.
pub use command::CommandHandler;
/// A line of output destined for the terminal.
pub use command::Message;
/// Anything that accepts terminal messages.
pub use command::MessageSink;
/// Result of a Tab press.
pub use completion::Completion;
/// Byte input with a read timeout.
pub use console::ByteSource;
/// Immediate terminal output.
pub use console::Console;
/// A resolved command ready to run.
pub use editor::CommandJob;
/// Hands jobs to whatever runs them.
pub use editor::Dispatcher;
/// Borrowed collaborators for one editor step.
pub use editor::EditorEnv;
/// The per-byte input state machine.
pub use editor::LineEditor;
/// Escape codes and message framing.
pub use profile::TerminalProfile;
/// Validated command tree plus the `help`/`helptree` built-ins.
pub use registry::Registry;
