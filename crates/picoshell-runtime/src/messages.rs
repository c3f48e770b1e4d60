//! Bounded message queue between the worker and terminal contexts.
//!
//! Any context may post; only the terminal context drains. When the queue is
//! full the oldest message is discarded and counted, so producers never block
//! and memory stays bounded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use picoshell_terminal::{Message, MessageSink};

pub struct MessageQueue {
    messages: Mutex<VecDeque<Message>>,
    capacity: usize,
    dropped: AtomicUsize,
}

impl MessageQueue {
    /// A queue holding at most `capacity` messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            dropped: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        // A panicking producer cannot leave the deque half-updated.
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Append a message. Returns `true` if the oldest one had to go.
    pub fn push(&self, message: Message) -> bool {
        let mut queue = self.lock();
        let evicted = if queue.len() >= self.capacity {
            queue.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        };
        queue.push_back(message);
        evicted
    }

    pub fn pop(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    /// Messages lost to overflow since the last call. Resets the count.
    pub fn take_dropped(&self) -> usize {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MessageSink for MessageQueue {
    fn post(&self, message: Message) {
        if self.push(message) {
            log::trace!("message queue full, dropped oldest");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(q: &MessageQueue) -> Vec<String> {
        std::iter::from_fn(|| q.pop()).map(|m| m.text).collect()
    }

    #[test]
    fn fifo_order() {
        let q = MessageQueue::new(4);
        q.print("a");
        q.info("b");
        q.error("c");
        assert_eq!(q.len(), 3);
        assert_eq!(texts(&q), ["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn overflow_drops_oldest_and_counts() {
        let q = MessageQueue::new(2);
        assert!(!q.push(Message::plain("1")));
        assert!(!q.push(Message::plain("2")));
        assert!(q.push(Message::plain("3")));
        assert!(q.push(Message::plain("4")));
        assert_eq!(q.dropped(), 2);
        assert_eq!(q.take_dropped(), 2);
        assert_eq!(q.take_dropped(), 0);
        assert_eq!(texts(&q), ["3", "4"]);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let q = MessageQueue::new(0);
        assert_eq!(q.capacity(), 1);
        q.print("x");
        q.print("y");
        assert_eq!(texts(&q), ["y"]);
        assert_eq!(q.take_dropped(), 1);
    }

    #[test]
    fn severity_survives_queueing() {
        let q = MessageQueue::new(1);
        q.warn("careful\n");
        assert_eq!(q.pop(), Some(Message::warning("careful\n")));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nothing_lost_without_being_counted(cap in 1usize..8, n in 0usize..40) {
                let q = MessageQueue::new(cap);
                for i in 0..n {
                    q.print(&i.to_string());
                }
                prop_assert_eq!(q.len(), n.min(cap));
                prop_assert_eq!(q.take_dropped(), n.saturating_sub(cap));
                let expected: Vec<String> = (n.saturating_sub(cap)..n).map(|i| i.to_string()).collect();
                prop_assert_eq!(texts(&q), expected);
            }
        }
    }
}
