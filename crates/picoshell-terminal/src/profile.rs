//! Escape-code tables and message framing.

use picoshell_types::config::TerminalKind;
use picoshell_types::error::Severity;

use crate::command::Message;

/// Indentation unit used by listings.
pub const TAB: &str = "    ";

/// Tag in front of every shell message.
pub const MESSAGE_TAG: &str = "[SHELL] ";

/// The escape strings the editor emits. Cursor movement and line clearing are
/// required; styling may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalProfile {
    pub move_left: &'static str,
    pub move_right: &'static str,
    pub erase_right: &'static str,
    pub clear_line: &'static str,
    pub bold_on: &'static str,
    pub bold_off: &'static str,
    pub color_reset: &'static str,
    pub prompt_color: &'static str,
    pub info_color: &'static str,
    pub warning_color: &'static str,
    pub error_color: &'static str,
}

impl TerminalProfile {
    pub const VT100: Self = Self {
        move_left: "\x1B[D",
        move_right: "\x1B[C",
        erase_right: "\x1B[0K",
        clear_line: "\x1B[2K\r",
        bold_on: "\x1B[1m",
        bold_off: "\x1B[0m",
        color_reset: "\x1B[0m",
        prompt_color: "\x1B[92m",
        info_color: "\x1B[94m",
        warning_color: "\x1B[93m",
        error_color: "\x1B[91m",
    };

    /// Cursor control only. Useful for logs and dumb serial monitors.
    pub const PLAIN: Self = Self {
        move_left: "\x1B[D",
        move_right: "\x1B[C",
        erase_right: "\x1B[0K",
        clear_line: "\x1B[2K\r",
        bold_on: "",
        bold_off: "",
        color_reset: "",
        prompt_color: "",
        info_color: "",
        warning_color: "",
        error_color: "",
    };

    pub fn from_kind(kind: TerminalKind) -> Self {
        match kind {
            TerminalKind::Vt100 => Self::VT100,
            TerminalKind::Plain => Self::PLAIN,
        }
    }

    fn color(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Info => self.info_color,
            Severity::Warning => self.warning_color,
            Severity::Error => self.error_color,
        }
    }

    /// `<color><bold>text<bold off><reset>`
    pub fn prompt(&self, text: &str) -> String {
        format!(
            "{}{}{text}{}{}",
            self.prompt_color, self.bold_on, self.bold_off, self.color_reset
        )
    }

    /// The `[SHELL] ` prefix for a message of the given severity.
    pub fn message_begin(&self, severity: Severity) -> String {
        format!(
            "{}{}{MESSAGE_TAG}{}{}",
            self.color(severity),
            self.bold_on,
            self.bold_off,
            self.color_reset
        )
    }

    pub fn bold(&self, text: &str) -> String {
        format!("{}{text}{}", self.bold_on, self.bold_off)
    }

    pub fn render(&self, message: &Message) -> String {
        match message.severity {
            Some(severity) => format!("{}{}", self.message_begin(severity), message.text),
            None => message.text.clone(),
        }
    }

    pub fn dropped_notice(&self, count: usize) -> String {
        format!(
            "{}{}--- {count} messages dropped ---\n{}{}",
            self.error_color, self.bold_on, self.color_reset, self.bold_off
        )
    }
}

impl Default for TerminalProfile {
    fn default() -> Self {
        Self::VT100
    }
}
