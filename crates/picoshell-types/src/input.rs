//! Byte-level input vocabulary.
//!
//! The shell reads a 7-bit byte stream. Control bytes that drive the line
//! editor are mapped to [`ControlKey`]; escape sequences decode to
//! [`EditKey`].

/// A control byte the line editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Ctrl-C, discards the current line.
    Interrupt,
    /// Ctrl-D, submits like Enter.
    EndOfText,
    /// Backspace or DEL.
    Backspace,
    /// Tab, requests autocompletion.
    Tab,
    /// Carriage return.
    Enter,
    /// Start of an escape sequence.
    Escape,
}

impl ControlKey {
    pub const CTRL_C: u8 = 0x03;
    pub const CTRL_D: u8 = 0x04;
    pub const BACKSPACE: u8 = 0x08;
    pub const TAB: u8 = 0x09;
    pub const ENTER: u8 = 0x0D;
    pub const ESCAPE: u8 = 0x1B;
    pub const DEL: u8 = 0x7F;

    /// Classify a raw byte. Returns `None` for anything that is not a
    /// recognised control byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            Self::CTRL_C => Some(Self::Interrupt),
            Self::CTRL_D => Some(Self::EndOfText),
            Self::BACKSPACE | Self::DEL => Some(Self::Backspace),
            Self::TAB => Some(Self::Tab),
            Self::ENTER => Some(Self::Enter),
            Self::ESCAPE => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Editing action produced by a decoded escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKey {
    Left,
    Right,
    Up,
    Down,
    Delete,
    Home,
    End,
}

/// Printable ASCII, the only bytes that are inserted into the line.
pub fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}
