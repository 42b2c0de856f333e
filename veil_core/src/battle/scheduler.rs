//! TickScheduler - actions queued to run on a later tick

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    ready_at: u64,
    seq: u64,
    action: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ready_at == other.ready_at && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        (other.ready_at, other.seq).cmp(&(self.ready_at, self.seq))
    }
}

/// Queue of `(ready_at_tick, action)`; equal ticks run in insertion order
pub struct TickScheduler<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TickScheduler<T> {
    fn default() -> Self {
        TickScheduler {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> std::fmt::Debug for TickScheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("pending", &self.heap.len())
            .field("next_ready", &self.next_ready())
            .finish()
    }
}

impl<T> TickScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, ready_at: u64, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { ready_at, seq, action });
    }

    /// Remove and return everything due at or before `tick`, in order
    pub fn pop_due(&mut self, tick: u64) -> Vec<T> {
        let mut due = Vec::new();
        while self.heap.peek().map_or(false, |e| e.ready_at <= tick) {
            if let Some(entry) = self.heap.pop() {
                due.push(entry.action);
            }
        }
        due
    }

    /// Tick of the earliest pending action
    pub fn next_ready(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.ready_at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
