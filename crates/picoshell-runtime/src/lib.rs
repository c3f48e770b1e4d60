//! The concurrency core of picoshell.
//!
//! Two contexts share three resources. The terminal context polls input,
//! drives the [`LineEditor`](picoshell_terminal::LineEditor) and prints
//! queued output. The worker context waits on a single-slot job handoff and
//! runs one handler at a time. Between them sit the bounded
//! [`MessageQueue`], the handoff itself and the busy flag.

pub mod messages;
pub mod shell;
pub mod source;
pub mod terminal;
pub mod worker;

/// Bounded drop-oldest output queue.
pub use messages::MessageQueue;
/// Shell lifecycle entry point.
pub use shell::Shell;
/// Handle to a started shell.
pub use shell::ShellHandle;
/// Byte source fed from an `mpsc` channel.
pub use source::ChannelSource;
/// Console writing to stdout.
pub use source::StdoutConsole;
/// One terminal context step at a time.
pub use terminal::Terminal;
/// The worker thread.
pub use worker::Worker;
/// Job submission side of the worker.
pub use worker::WorkerHandle;
