//! Shell lifecycle: register commands, then start both contexts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use picoshell_terminal::{
    ByteSource, Command, Console, Dispatcher, LineEditor, MessageSink, Registry,
};
use picoshell_types::config::ShellConfig;
use picoshell_types::error::{Result, ShellError};

use crate::messages::MessageQueue;
use crate::terminal::{TERMINAL_THREAD, Terminal};
use crate::worker::{Worker, WorkerHandle};

/// A configured shell that has not started yet.
pub struct Shell {
    config: ShellConfig,
    registry: Registry,
    messages: Arc<MessageQueue>,
    started: bool,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Result<Self> {
        config.validate()?;
        let messages = Arc::new(MessageQueue::new(config.message_queue_size));
        Ok(Self {
            config,
            registry: Registry::new(),
            messages,
            started: false,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Install the command tree. Allowed once, and only before
    /// [`start`](Self::start). A rejection is also posted to the terminal.
    pub fn register(&mut self, commands: Vec<Command>) -> Result<()> {
        let result = if self.started {
            log::warn!("command registration rejected: shell already started");
            Err(ShellError::AlreadyStarted)
        } else {
            self.registry.register(commands)
        };
        if let Err(e) = &result {
            self.messages.error(&format!("{e}\n"));
        }
        result
    }

    /// The deferred output channel. Usable from any thread.
    pub fn messages(&self) -> Arc<MessageQueue> {
        Arc::clone(&self.messages)
    }

    /// Spawn the worker and terminal contexts. Failing to spawn either is
    /// fatal to the shell.
    pub fn start(
        &mut self,
        input: Box<dyn ByteSource + Send>,
        console: Box<dyn Console + Send>,
    ) -> Result<ShellHandle> {
        if self.started {
            return Err(ShellError::AlreadyStarted);
        }
        if !self.registry.is_registered() {
            log::warn!("starting with no registered commands");
        }

        let worker = Worker::spawn(Arc::clone(&self.messages), self.config.announce_handlers)?;
        let dispatcher = worker.handle();
        let editor = LineEditor::new(std::mem::take(&mut self.registry), &self.config);
        let terminal = Terminal::new(
            editor,
            console,
            input,
            Box::new(dispatcher.clone()),
            Arc::clone(&self.messages),
            &self.config,
        );

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let terminal = match thread::Builder::new()
            .name(TERMINAL_THREAD.into())
            .spawn(move || terminal.run(&thread_stop))
        {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("failed to spawn terminal context: {e}");
                drop(dispatcher);
                // The worker exits once its last handle is gone.
                let _ = worker.join();
                return Err(e.into());
            },
        };

        self.started = true;
        log::info!("shell started");
        Ok(ShellHandle {
            stop,
            terminal,
            worker,
            dispatcher,
            messages: Arc::clone(&self.messages),
        })
    }
}

/// A running shell.
pub struct ShellHandle {
    stop: Arc<AtomicBool>,
    terminal: JoinHandle<()>,
    worker: Worker,
    dispatcher: WorkerHandle,
    messages: Arc<MessageQueue>,
}

impl ShellHandle {
    /// Whether a command handler is running right now.
    pub fn is_worker_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    /// True when no job is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.dispatcher.is_idle()
    }

    pub fn messages(&self) -> Arc<MessageQueue> {
        Arc::clone(&self.messages)
    }

    /// Ask the terminal context to stop after its current pass. A running
    /// handler is not interrupted.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Wait for the terminal context to finish (input closed or
    /// [`stop`](Self::stop) called), then for the worker to drain.
    pub fn join(self) -> Result<()> {
        let terminal = self.terminal.join().map_err(|_| {
            log::error!("terminal context panicked");
            ShellError::Command("terminal context panicked".into())
        });
        drop(self.dispatcher);
        let worker = self.worker.join();
        log::info!("shell stopped");
        terminal.and(worker)
    }
}
