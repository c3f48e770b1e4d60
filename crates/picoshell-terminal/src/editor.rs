//! Per-byte line editing and command submission.

use std::sync::Arc;
use std::time::Duration;

use picoshell_types::config::ShellConfig;
use picoshell_types::error::{Result, Severity, ShellError};
use picoshell_types::input::{ControlKey, EditKey, is_printable};

use crate::buffer::InputBuffer;
use crate::command::CommandHandler;
use crate::completion::{self, Completion};
use crate::console::{ByteSource, Console};
use crate::escape::{self, Decoded};
use crate::help;
#[cfg(feature = "history")]
use crate::history::History;
use crate::profile::{TAB, TerminalProfile};
use crate::registry::{HELP, HELPTREE, Registry};
use crate::tokenizer::{is_blank, tokenize};

/// A resolved command, ready to be run.
#[derive(Clone)]
pub struct CommandJob {
    /// The command path as typed, e.g. `led blink`.
    pub path: String,
    pub handler: Arc<dyn CommandHandler>,
    /// Tokens after the command path.
    pub args: Vec<String>,
}

impl std::fmt::Debug for CommandJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandJob")
            .field("path", &self.path)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Runs submitted jobs somewhere else.
pub trait Dispatcher {
    /// True while a handler is executing.
    fn is_busy(&self) -> bool;

    /// Hand over a job without blocking. Fails if one is already pending.
    fn submit(&self, job: CommandJob) -> Result<()>;

    /// True when nothing is running and nothing is waiting to run.
    fn is_idle(&self) -> bool {
        !self.is_busy()
    }
}

/// Collaborators borrowed for one editor step.
pub struct EditorEnv<'a> {
    pub console: &'a mut dyn Console,
    pub input: &'a mut dyn ByteSource,
    pub dispatcher: &'a dyn Dispatcher,
}

/// The input state machine. Owns the live line, the registered commands and
/// the history ring.
pub struct LineEditor {
    registry: Registry,
    profile: TerminalProfile,
    prompt: String,
    buffer: InputBuffer,
    max_tokens: usize,
    escape_timeout: Duration,
    #[cfg(feature = "history")]
    history: Option<History>,
    #[cfg(feature = "history")]
    history_offset: usize,
}

impl LineEditor {
    pub fn new(registry: Registry, config: &ShellConfig) -> Self {
        Self {
            registry,
            profile: TerminalProfile::from_kind(config.terminal),
            prompt: config.prompt.clone(),
            buffer: InputBuffer::with_capacity(config.max_line_length),
            max_tokens: config.max_tokens,
            escape_timeout: Duration::from_micros(config.escape_timeout_us),
            #[cfg(feature = "history")]
            history: config
                .history_enabled()
                .then(|| History::with_size(config.history_size, config.max_line_length)),
            #[cfg(feature = "history")]
            history_offset: 0,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn profile(&self) -> &TerminalProfile {
        &self.profile
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    /// Clear the current terminal line.
    pub fn remove_prompt(&self, console: &mut dyn Console) {
        console.write_str(self.profile.clear_line);
    }

    /// Draw the prompt and the live line, leaving the terminal cursor where
    /// the editor cursor is.
    pub fn restore_prompt(&self, console: &mut dyn Console) {
        console.write_str(&self.profile.prompt(&self.prompt));
        console.write_str(self.buffer.as_str());
        self.move_left(console, self.buffer.len() - self.buffer.cursor());
    }

    fn redraw(&self, console: &mut dyn Console) {
        self.remove_prompt(console);
        self.restore_prompt(console);
    }

    fn move_left(&self, console: &mut dyn Console, n: usize) {
        for _ in 0..n {
            console.write_str(self.profile.move_left);
        }
    }

    /// Feed one input byte.
    pub fn feed(&mut self, byte: u8, env: &mut EditorEnv<'_>) {
        match ControlKey::from_byte(byte) {
            Some(ControlKey::Interrupt) => self.interrupt(env.console),
            Some(ControlKey::Backspace) => self.backspace(env.console),
            Some(ControlKey::Enter | ControlKey::EndOfText) => self.submit(env),
            Some(ControlKey::Tab) => self.complete(env.console),
            Some(ControlKey::Escape) => self.escape(env),
            None => self.insert(byte, env.console),
        }
    }

    fn interrupt(&mut self, console: &mut dyn Console) {
        console.write_str("^C\n");
        self.buffer.clear();
        self.restore_prompt(console);
    }

    fn backspace(&mut self, console: &mut dyn Console) {
        if self.buffer.backspace() {
            self.redraw(console);
        }
    }

    fn insert(&mut self, byte: u8, console: &mut dyn Console) {
        if !is_printable(byte) || self.buffer.is_full() {
            return;
        }
        let mid_line = !self.buffer.at_end();
        if mid_line {
            console.write_str(self.profile.erase_right);
        }
        self.buffer.insert(byte);
        console.put_byte(byte);
        if mid_line {
            console.write_str(self.buffer.tail());
            self.move_left(console, self.buffer.tail().len());
        }
    }

    fn submit(&mut self, env: &mut EditorEnv<'_>) {
        if env.dispatcher.is_busy() {
            self.remove_prompt(env.console);
            self.report(&ShellError::Busy, env.console);
            self.restore_prompt(env.console);
            return;
        }

        let blank = is_blank(self.buffer.as_str());
        if !blank {
            env.console.put_byte(b'\n');
        }
        self.buffer.end();

        #[cfg(feature = "history")]
        if !blank && let Some(history) = self.history.as_mut() {
            history.append(&self.buffer);
            self.history_offset = 0;
        }

        if let Err(e) = self.execute_line(self.buffer.as_str(), env) {
            self.report(&e, env.console);
        }

        if blank {
            env.console.put_byte(b'\n');
        }
        self.buffer.clear();
        self.restore_prompt(env.console);
    }

    /// Tokenize, resolve and dispatch one line. Blank lines are a no-op;
    /// `help` and `helptree` are answered here without a dispatch.
    pub fn execute_line(&self, line: &str, env: &mut EditorEnv<'_>) -> Result<()> {
        if is_blank(line) {
            return Ok(());
        }
        let tokens = tokenize(line, self.max_tokens)?;
        let Some(&first) = tokens.first() else {
            return Ok(());
        };

        if first == HELP || first == HELPTREE {
            let text = help::render(&self.registry, &tokens[1..], first == HELPTREE, &self.profile)?;
            env.console.write_str(&text);
            return Ok(());
        }

        let resolved = self.registry.resolve(&tokens)?;
        let handler = resolved
            .command
            .handler()
            .map(Arc::clone)
            .ok_or_else(|| ShellError::Incomplete(resolved.path.clone()))?;
        let args: Vec<String> = tokens[resolved.level..]
            .iter()
            .map(|s| s.to_string())
            .collect();
        log::debug!("dispatching '{}' with {} args", resolved.path, args.len());

        env.dispatcher.submit(CommandJob {
            path: resolved.path,
            handler,
            args,
        })
    }

    /// Print a diagnostic and its hint with the matching framing.
    pub fn report(&self, err: &ShellError, console: &mut dyn Console) {
        log::debug!("input rejected: {err}");
        let begin = self.profile.message_begin(err.severity());
        console.write_str(&format!("{begin}{err}\n"));
        if let Some(hint) = err.hint() {
            console.write_str(&format!("{begin}{hint}\n"));
        }
    }

    fn complete(&mut self, console: &mut dyn Console) {
        if !self.buffer.at_end() {
            return;
        }
        match completion::complete(&self.registry, self.buffer.as_str(), self.max_tokens) {
            Ok(Completion::None) => {},
            Ok(Completion::Insert(text)) => {
                for b in text.bytes() {
                    self.insert(b, console);
                }
            },
            Ok(Completion::List(names)) => {
                let mut out = String::from("\n");
                out.push_str(&self.profile.message_begin(Severity::Info));
                out.push_str(self.profile.bold_on);
                for name in &names {
                    out.push_str(name);
                    out.push_str(TAB);
                }
                out.push_str(self.profile.bold_off);
                out.push('\n');
                console.write_str(&out);
                self.restore_prompt(console);
            },
            Err(e) => self.report(&e, console),
        }
    }

    fn escape(&mut self, env: &mut EditorEnv<'_>) {
        match escape::decode(env.input, self.escape_timeout) {
            Decoded::Key { key, trailing } => {
                self.apply_key(key, env.console);
                for b in trailing {
                    self.feed(b, env);
                }
            },
            Decoded::Literal(bytes) => {
                for b in bytes {
                    self.feed(b, env);
                }
            },
            Decoded::Nothing => {},
        }
    }

    fn apply_key(&mut self, key: EditKey, console: &mut dyn Console) {
        match key {
            EditKey::Left => {
                if self.buffer.move_left() {
                    console.write_str(self.profile.move_left);
                }
            },
            EditKey::Right => {
                if self.buffer.move_right() {
                    console.write_str(self.profile.move_right);
                }
            },
            EditKey::Delete => {
                if self.buffer.delete() {
                    self.redraw(console);
                }
            },
            EditKey::Home => {
                self.move_left(console, self.buffer.cursor());
                self.buffer.home();
            },
            EditKey::End => {
                console.write_str(self.buffer.tail());
                self.buffer.end();
            },
            #[cfg(feature = "history")]
            EditKey::Up => self.history_older(console),
            #[cfg(feature = "history")]
            EditKey::Down => self.history_newer(console),
            #[cfg(not(feature = "history"))]
            EditKey::Up | EditKey::Down => {},
        }
    }

    #[cfg(feature = "history")]
    fn history_older(&mut self, console: &mut dyn Console) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        if self.history_offset == 0 {
            history.update_newest(&self.buffer);
        }
        let Some(entry) = history.get(self.history_offset + 1) else {
            return;
        };
        self.buffer.clone_from(entry);
        self.history_offset += 1;
        self.redraw(console);
    }

    #[cfg(feature = "history")]
    fn history_newer(&mut self, console: &mut dyn Console) {
        if self.history_offset == 0 {
            return;
        }
        let Some(entry) = self
            .history
            .as_ref()
            .and_then(|h| h.get(self.history_offset - 1))
        else {
            return;
        };
        self.buffer.clone_from(entry);
        self.history_offset -= 1;
        self.redraw(console);
    }
}
