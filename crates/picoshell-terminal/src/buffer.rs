//! The editable input line.

/// Text plus an insertion point, holding at most `capacity` bytes. Only
/// ASCII is ever inserted, so byte offsets and char offsets coincide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
    capacity: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    /// A buffer with no length bound.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity.min(256)),
            cursor: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.text.len() >= self.capacity
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.text.len()
    }

    /// Bytes from the cursor to the end of the line.
    pub fn tail(&self) -> &str {
        &self.text[self.cursor..]
    }

    /// Insert at the cursor and step past it. Returns false, leaving the
    /// line untouched, for a non-ASCII byte or when the buffer is full.
    pub fn insert(&mut self, b: u8) -> bool {
        if !b.is_ascii() || self.is_full() {
            return false;
        }
        self.text.insert(self.cursor, char::from(b));
        self.cursor += 1;
        true
    }

    /// Remove the byte before the cursor. Returns false at the start of line.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.text.remove(self.cursor);
        true
    }

    /// Remove the byte under the cursor. Returns false at end of line.
    pub fn delete(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(s: &str) -> InputBuffer {
        filled_in(InputBuffer::new(), s)
    }

    fn filled_in(mut buf: InputBuffer, s: &str) -> InputBuffer {
        for b in s.bytes() {
            assert!(buf.insert(b));
        }
        buf
    }

    #[test]
    fn insert_appends_and_advances() {
        let buf = filled("abc");
        assert_eq!(buf.as_str(), "abc");
        assert_eq!(buf.cursor(), 3);
        assert!(buf.at_end());
    }

    #[test]
    fn insert_mid_line_shifts_right() {
        let mut buf = filled("ac");
        buf.move_left();
        buf.insert(b'b');
        assert_eq!(buf.as_str(), "abc");
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.tail(), "c");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buf = filled("ab");
        buf.home();
        assert!(!buf.backspace());
        assert_eq!(buf.as_str(), "ab");
    }

    #[test]
    fn backspace_mid_line() {
        let mut buf = filled("abc");
        buf.move_left();
        assert!(buf.backspace());
        assert_eq!(buf.as_str(), "ac");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn delete_under_cursor() {
        let mut buf = filled("abc");
        assert!(!buf.delete());
        buf.home();
        assert!(buf.delete());
        assert_eq!(buf.as_str(), "bc");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn cursor_moves_are_bounded() {
        let mut buf = filled("a");
        assert!(!buf.move_right());
        assert!(buf.move_left());
        assert!(!buf.move_left());
        buf.end();
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn insert_stops_at_capacity() {
        let mut buf = InputBuffer::with_capacity(3);
        assert!(buf.insert(b'a'));
        assert!(buf.insert(b'c'));
        buf.move_left();
        assert!(buf.insert(b'b'));
        assert!(buf.is_full());
        assert!(!buf.insert(b'd'));
        assert_eq!(buf.as_str(), "abc");
        assert_eq!(buf.cursor(), 2);
        assert!(buf.backspace());
        assert!(!buf.is_full());
        assert!(buf.insert(b'x'));
        assert_eq!(buf.as_str(), "axc");
    }

    #[test]
    fn non_ascii_rejected() {
        let mut buf = InputBuffer::new();
        assert!(!buf.insert(0xC3));
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), usize::MAX);
    }

    #[test]
    fn clone_keeps_capacity() {
        let mut dst = InputBuffer::new();
        dst.clone_from(&filled_in(InputBuffer::with_capacity(2), "ab"));
        assert_eq!(dst.capacity(), 2);
        assert!(!dst.insert(b'c'));
    }

    #[test]
    fn clear_resets_cursor() {
        let mut buf = filled("abc");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }
}
