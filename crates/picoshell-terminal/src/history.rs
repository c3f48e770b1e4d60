//! Fixed-capacity ring of submitted lines.
//!
//! The ring holds one slot more than the number of reachable entries. The
//! extra slot, just past the newest entry, is scratch space where the live
//! line is stashed while the user browses, so arrowing back down to offset 0
//! brings it back.

use crate::buffer::InputBuffer;

#[derive(Debug, Clone)]
pub struct History {
    slots: Vec<InputBuffer>,
    head: usize,
    occupancy: usize,
}

impl History {
    /// A ring that keeps `size` reachable entries of up to `line_capacity`
    /// bytes each.
    pub fn with_size(size: usize, line_capacity: usize) -> Self {
        Self {
            slots: vec![InputBuffer::with_capacity(line_capacity); size + 1],
            head: 0,
            occupancy: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.occupancy
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupancy == self.capacity()
    }

    fn newest_slot(&self) -> usize {
        (self.head + self.occupancy) % self.capacity()
    }

    /// Store a copy of `entry`, overwriting the oldest once full.
    pub fn append(&mut self, entry: &InputBuffer) {
        let idx = self.newest_slot();
        self.slots[idx].clone_from(entry);
        if self.is_full() {
            self.head = (self.head + 1) % self.capacity();
        } else {
            self.occupancy += 1;
        }
    }

    /// Entry `offset` steps back from the newest; 1 is the most recent.
    /// Offset 0 addresses the scratch slot.
    pub fn get(&self, offset: usize) -> Option<&InputBuffer> {
        if self.is_empty() {
            return None;
        }
        let reachable = if self.is_full() {
            offset < self.occupancy
        } else {
            offset <= self.occupancy
        };
        if !reachable {
            return None;
        }
        let idx = (self.head + self.occupancy - offset) % self.capacity();
        Some(&self.slots[idx])
    }

    /// Overwrite the scratch slot.
    pub fn update_newest(&mut self, entry: &InputBuffer) {
        let idx = self.newest_slot();
        self.slots[idx].clone_from(entry);
    }

    /// Forget every entry. Storage is kept.
    pub fn reset(&mut self) {
        self.head = 0;
        self.occupancy = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: usize = 32;

    fn line(s: &str) -> InputBuffer {
        let mut buf = InputBuffer::with_capacity(LINE);
        for b in s.bytes() {
            buf.insert(b);
        }
        buf
    }

    #[test]
    fn empty_get_fails() {
        let h = History::with_size(3, LINE);
        assert!(h.is_empty());
        assert!(h.get(0).is_none());
        assert!(h.get(1).is_none());
    }

    #[test]
    fn newest_is_offset_one() {
        let mut h = History::with_size(3, LINE);
        h.append(&line("one"));
        h.append(&line("two"));
        assert_eq!(h.get(1).unwrap().as_str(), "two");
        assert_eq!(h.get(2).unwrap().as_str(), "one");
        assert!(h.get(3).is_none());
    }

    #[test]
    fn fills_to_capacity_then_wraps() {
        let mut h = History::with_size(3, LINE);
        assert_eq!(h.capacity(), 4);
        for s in ["a", "b", "c", "d"] {
            h.append(&line(s));
        }
        assert!(h.is_full());
        // Full: only `size` entries reachable, the oldest slot is scratch.
        assert_eq!(h.get(1).unwrap().as_str(), "d");
        assert_eq!(h.get(3).unwrap().as_str(), "b");
        assert!(h.get(4).is_none());

        h.append(&line("e"));
        assert_eq!(h.get(1).unwrap().as_str(), "e");
        assert_eq!(h.get(3).unwrap().as_str(), "c");
        assert!(h.get(4).is_none());
    }

    #[test]
    fn not_full_bound_is_inclusive() {
        let mut h = History::with_size(3, LINE);
        for s in ["a", "b", "c"] {
            h.append(&line(s));
        }
        assert!(!h.is_full());
        assert_eq!(h.get(3).unwrap().as_str(), "a");
        assert!(h.get(4).is_none());
    }

    #[test]
    fn scratch_slot_round_trip() {
        let mut h = History::with_size(3, LINE);
        h.append(&line("old"));
        h.update_newest(&line("typing"));
        assert_eq!(h.get(0).unwrap().as_str(), "typing");
        assert_eq!(h.get(1).unwrap().as_str(), "old");
    }

    #[test]
    fn scratch_slot_when_full() {
        let mut h = History::with_size(2, LINE);
        for s in ["a", "b", "c"] {
            h.append(&line(s));
        }
        assert!(h.is_full());
        h.update_newest(&line("live"));
        assert_eq!(h.get(0).unwrap().as_str(), "live");
        assert_eq!(h.get(1).unwrap().as_str(), "c");
        assert_eq!(h.get(2).unwrap().as_str(), "b");
    }

    #[test]
    fn entry_keeps_cursor() {
        let mut h = History::with_size(1, LINE);
        let mut buf = line("abc");
        buf.move_left();
        h.append(&buf);
        assert_eq!(h.get(1).unwrap().cursor(), 2);
    }

    #[test]
    fn reset_empties() {
        let mut h = History::with_size(2, LINE);
        h.append(&line("x"));
        h.reset();
        assert!(h.is_empty());
        assert!(h.get(1).is_none());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn most_recent_entries_reachable(
                size in 1usize..8,
                entries in proptest::collection::vec("[a-z]{1,6}", 0..24)
            ) {
                let mut h = History::with_size(size, LINE);
                for e in &entries {
                    h.append(&line(e));
                }
                let reachable = entries.len().min(size);
                for k in 1..=reachable {
                    let got = h.get(k).map(|b| b.as_str().to_string());
                    prop_assert_eq!(got.as_deref(), Some(entries[entries.len() - k].as_str()));
                }
                prop_assert!(h.get(reachable + 1).is_none());
                prop_assert!(h.len() <= h.capacity());
            }
        }
    }
}
