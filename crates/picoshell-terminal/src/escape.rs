//! Escape-sequence decoding.
//!
//! Entered after the editor sees `ESC`. The decoder pulls up to the length of
//! the longest known sequence from the byte source and matches the read bytes
//! against a fixed table by prefix, first entry wins.

use std::time::Duration;

use picoshell_types::input::EditKey;

use crate::console::ByteSource;

/// One recognised sequence, without the leading `ESC`.
#[derive(Debug, Clone, Copy)]
pub struct EscapeSequence {
    pub bytes: &'static [u8],
    pub key: EditKey,
}

const fn seq(bytes: &'static [u8], key: EditKey) -> EscapeSequence {
    EscapeSequence { bytes, key }
}

/// Table order matters: earlier entries win on a shared prefix.
#[cfg(feature = "history")]
pub const SEQUENCES: &[EscapeSequence] = &[
    seq(b"[D", EditKey::Left),
    seq(b"[C", EditKey::Right),
    seq(b"[B", EditKey::Down),
    seq(b"[A", EditKey::Up),
    seq(b"[3~", EditKey::Delete),
    seq(b"[1~", EditKey::Home),
    seq(b"[H", EditKey::Home),
    seq(b"OF", EditKey::End),
    seq(b"[F", EditKey::End),
];

#[cfg(not(feature = "history"))]
pub const SEQUENCES: &[EscapeSequence] = &[
    seq(b"[D", EditKey::Left),
    seq(b"[C", EditKey::Right),
    seq(b"[3~", EditKey::Delete),
    seq(b"[1~", EditKey::Home),
    seq(b"[H", EditKey::Home),
    seq(b"OF", EditKey::End),
    seq(b"[F", EditKey::End),
];

/// Literal text echoed in place of an unrecognised `ESC`.
pub const ESCAPE_MARKER: &[u8] = b"\\033";

fn longest_sequence() -> usize {
    SEQUENCES.iter().map(|s| s.bytes.len()).max().unwrap_or(0)
}

/// What an escape sequence turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A table match. `trailing` holds bytes read past the match, which
    /// belong to ordinary input.
    Key { key: EditKey, trailing: Vec<u8> },
    /// No match: bytes to push back through the editor as if typed.
    Literal(Vec<u8>),
    /// Nothing followed the `ESC` in time.
    Nothing,
}

/// Read and classify the bytes following an `ESC`.
pub fn decode(input: &mut dyn ByteSource, timeout: Duration) -> Decoded {
    let max = longest_sequence();
    let mut read = Vec::with_capacity(max);
    while read.len() < max {
        match input.read_byte(timeout) {
            Some(b) if b.is_ascii() => read.push(b),
            _ => break,
        }
    }
    classify(&read)
}

/// Match already-read bytes against the table.
pub fn classify(read: &[u8]) -> Decoded {
    if let Some(found) = SEQUENCES.iter().find(|s| read.starts_with(s.bytes)) {
        return Decoded::Key {
            key: found.key,
            trailing: read[found.bytes.len()..].to_vec(),
        };
    }
    if read.is_empty() {
        return Decoded::Nothing;
    }
    log::debug!("unrecognised escape sequence {read:?}");
    let mut literal = ESCAPE_MARKER.to_vec();
    literal.extend_from_slice(read);
    Decoded::Literal(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn source(bytes: &[u8]) -> VecDeque<u8> {
        bytes.iter().copied().collect()
    }

    #[test]
    fn arrows_and_editing_keys() {
        let cases = [
            ("[D", EditKey::Left),
            ("[C", EditKey::Right),
            ("[3~", EditKey::Delete),
            ("[1~", EditKey::Home),
            ("[H", EditKey::Home),
            ("OF", EditKey::End),
            ("[F", EditKey::End),
        ];
        for (seq, key) in cases {
            let mut src = source(seq.as_bytes());
            assert_eq!(
                decode(&mut src, Duration::ZERO),
                Decoded::Key {
                    key,
                    trailing: Vec::new()
                },
                "{seq}"
            );
        }
    }

    #[cfg(feature = "history")]
    #[test]
    fn history_arrows() {
        assert_eq!(
            classify(b"[A"),
            Decoded::Key {
                key: EditKey::Up,
                trailing: Vec::new()
            }
        );
        assert_eq!(
            classify(b"[B"),
            Decoded::Key {
                key: EditKey::Down,
                trailing: Vec::new()
            }
        );
    }

    #[cfg(not(feature = "history"))]
    #[test]
    fn history_arrows_absent() {
        assert_eq!(classify(b"[A"), Decoded::Literal(b"\\033[A".to_vec()));
    }

    #[test]
    fn reads_at_most_three_bytes() {
        let mut src = source(b"[Dxyz");
        assert_eq!(
            decode(&mut src, Duration::ZERO),
            Decoded::Key {
                key: EditKey::Left,
                trailing: b"x".to_vec()
            }
        );
        assert_eq!(src, source(b"yz"));
    }

    #[test]
    fn unknown_sequence_becomes_literal() {
        let mut src = source(b"[Z");
        assert_eq!(
            decode(&mut src, Duration::ZERO),
            Decoded::Literal(b"\\033[Z".to_vec())
        );
    }

    #[test]
    fn lone_escape_is_nothing() {
        let mut src = source(b"");
        assert_eq!(decode(&mut src, Duration::ZERO), Decoded::Nothing);
    }

    #[test]
    fn high_byte_stops_reading() {
        let mut src = source(&[b'[', 0xC3, b'D']);
        assert_eq!(
            decode(&mut src, Duration::ZERO),
            Decoded::Literal(b"\\033[".to_vec())
        );
        // The byte after the high one is left for normal input.
        assert_eq!(src, source(b"D"));
    }

    #[test]
    fn partial_prefix_is_literal() {
        assert_eq!(classify(b"["), Decoded::Literal(b"\\033[".to_vec()));
        assert_eq!(classify(b"[3"), Decoded::Literal(b"\\033[3".to_vec()));
    }
}
