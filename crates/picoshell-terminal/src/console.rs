//! Byte-level terminal collaborators.

use std::collections::VecDeque;
use std::time::Duration;

/// Immediate terminal output. Echo and redraws go straight here; deferred
/// output goes through a [`MessageSink`](crate::command::MessageSink).
pub trait Console {
    fn write_str(&mut self, s: &str);

    fn put_byte(&mut self, b: u8) {
        let mut tmp = [0u8; 4];
        self.write_str(char::from(b).encode_utf8(&mut tmp));
    }
}

impl Console for String {
    fn write_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

/// Source of raw input bytes.
pub trait ByteSource {
    /// Next byte, waiting at most `timeout`. `None` means nothing arrived.
    fn read_byte(&mut self, timeout: Duration) -> Option<u8>;

    /// True once no more bytes will ever arrive.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Scripted input. Never blocks.
impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self, _timeout: Duration) -> Option<u8> {
        self.pop_front()
    }
}
