//! Concrete byte sources and consoles.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use picoshell_terminal::{ByteSource, Console};

/// Bytes pushed from another thread (a stdin reader, a UART interrupt
/// bridge, a test).
pub struct ChannelSource {
    rx: Receiver<u8>,
    closed: bool,
}

impl ChannelSource {
    pub fn new(rx: Receiver<u8>) -> Self {
        Self { rx, closed: false }
    }
}

/// A connected sender/source pair.
pub fn channel() -> (Sender<u8>, ChannelSource) {
    let (tx, rx) = mpsc::channel();
    (tx, ChannelSource::new(rx))
}

impl ByteSource for ChannelSource {
    fn read_byte(&mut self, timeout: Duration) -> Option<u8> {
        if self.closed {
            return None;
        }
        let result = if timeout.is_zero() {
            self.rx.try_recv().map_err(|e| match e {
                TryRecvError::Empty => RecvTimeoutError::Timeout,
                TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
            })
        } else {
            self.rx.recv_timeout(timeout)
        };
        match result {
            Ok(b) => Some(b),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log::debug!("input channel closed");
                self.closed = true;
                None
            },
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Writes straight to the process stdout, flushing after every write so
/// echo shows up immediately.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_str(&mut self, s: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(s.as_bytes()).and_then(|()| out.flush()) {
            log::debug!("stdout write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order_then_times_out() {
        let (tx, mut src) = channel();
        tx.send(b'a').unwrap();
        tx.send(b'b').unwrap();
        assert_eq!(src.read_byte(Duration::ZERO), Some(b'a'));
        assert_eq!(src.read_byte(Duration::from_micros(10)), Some(b'b'));
        assert_eq!(src.read_byte(Duration::from_micros(10)), None);
        assert!(!src.is_closed());
    }

    #[test]
    fn closes_after_sender_dropped() {
        let (tx, mut src) = channel();
        tx.send(b'x').unwrap();
        drop(tx);
        assert_eq!(src.read_byte(Duration::ZERO), Some(b'x'));
        assert!(!src.is_closed());
        assert_eq!(src.read_byte(Duration::ZERO), None);
        assert!(src.is_closed());
    }

    #[test]
    fn wakes_on_late_byte() {
        let (tx, mut src) = channel();
        let producer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            tx.send(b'z').unwrap();
        });
        assert_eq!(src.read_byte(Duration::from_secs(5)), Some(b'z'));
        producer.join().unwrap();
    }
}
