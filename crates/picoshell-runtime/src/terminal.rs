//! The terminal context: polls input, feeds the editor, prints messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use picoshell_terminal::{ByteSource, Console, Dispatcher, EditorEnv, LineEditor};
use picoshell_types::config::ShellConfig;

use crate::messages::MessageQueue;

/// Thread name of the terminal context.
pub const TERMINAL_THREAD: &str = "picoshell-terminal";

/// Console, input and editor bound together.
pub struct Terminal {
    editor: LineEditor,
    console: Box<dyn Console + Send>,
    input: Box<dyn ByteSource + Send>,
    dispatcher: Box<dyn Dispatcher + Send>,
    messages: Arc<MessageQueue>,
    read_timeout: Duration,
    poll_interval: Duration,
}

impl Terminal {
    pub fn new(
        editor: LineEditor,
        console: Box<dyn Console + Send>,
        input: Box<dyn ByteSource + Send>,
        dispatcher: Box<dyn Dispatcher + Send>,
        messages: Arc<MessageQueue>,
        config: &ShellConfig,
    ) -> Self {
        Self {
            editor,
            console,
            input,
            dispatcher,
            messages,
            read_timeout: Duration::from_micros(config.read_timeout_us),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// Draw the initial prompt.
    pub fn show_prompt(&mut self) {
        self.editor.restore_prompt(self.console.as_mut());
    }

    /// Feed one raw input byte to the editor.
    pub fn feed(&mut self, byte: u8) {
        let mut env = EditorEnv {
            console: self.console.as_mut(),
            input: self.input.as_mut(),
            dispatcher: &*self.dispatcher,
        };
        self.editor.feed(byte, &mut env);
    }

    /// Print the drop notice if anything was lost since the last call.
    pub fn report_dropped(&mut self) {
        let dropped = self.messages.take_dropped();
        if dropped == 0 {
            return;
        }
        log::warn!("{dropped} messages dropped");
        self.editor.remove_prompt(self.console.as_mut());
        let notice = self.editor.profile().dropped_notice(dropped);
        self.console.write_str(&notice);
        self.editor.restore_prompt(self.console.as_mut());
    }

    /// Print every queued message, hiding the prompt around the batch.
    /// Returns how many were printed.
    pub fn drain_messages(&mut self) -> usize {
        let mut printed = 0;
        while let Some(message) = self.messages.pop() {
            if printed == 0 {
                self.editor.remove_prompt(self.console.as_mut());
            }
            let text = self.editor.profile().render(&message);
            self.console.write_str(&text);
            printed += 1;
        }
        if printed > 0 {
            self.editor.restore_prompt(self.console.as_mut());
        }
        printed
    }

    /// Feed bytes until the source has nothing more within the read timeout.
    /// Bytes outside 7-bit ASCII end the burst.
    pub fn read_input(&mut self) {
        while let Some(byte) = self.input.read_byte(self.read_timeout) {
            if byte > 0x7F {
                break;
            }
            self.feed(byte);
        }
    }

    /// One pass of the terminal context. Returns `false` once the input has
    /// closed.
    pub fn poll_once(&mut self) -> bool {
        self.report_dropped();
        self.drain_messages();
        self.read_input();
        !self.input.is_closed()
    }

    /// Poll until `stop` is raised or the input closes. On input close, any
    /// accepted job is allowed to finish so its output is still printed.
    pub fn run(mut self, stop: &AtomicBool) {
        log::info!("terminal context started");
        self.show_prompt();
        while !stop.load(Ordering::Acquire) {
            if !self.poll_once() {
                log::info!("input closed");
                self.settle(stop);
                break;
            }
            thread::sleep(self.poll_interval);
        }
        log::info!("terminal context stopped");
    }

    fn settle(&mut self, stop: &AtomicBool) {
        while !self.dispatcher.is_idle() && !stop.load(Ordering::Acquire) {
            self.report_dropped();
            self.drain_messages();
            thread::sleep(self.poll_interval);
        }
        self.report_dropped();
        self.drain_messages();
    }
}
