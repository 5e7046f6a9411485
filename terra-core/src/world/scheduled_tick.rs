//! The scheduled-tick queue (§4.1 stage 4, §3 "A scheduled-tick entry is
//! uniquely keyed by `(x, y, z, block_id)`").
//!
//! Entries carry an absolute `scheduled_time` compared directly against
//! `total_world_time` — the drain rule compares entries against the clock
//! rather than decrementing a per-entry relative-delay counter every tick,
//! so inter-chunk desync can't creep in as chunks load at different times.
//! Dedup-by-key and a binary-heap drain order keep the queue cheap to
//! insert into and cheap to drain.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use terra_utils::BlockPos;

/// The maximum number of entries drained from the queue in a single tick
/// (§8 boundary behaviour: "drains exactly 1000 and keeps the rest ordered").
pub const MAX_DRAIN_PER_TICK: usize = 1000;

/// A scheduled block tick (§3 "ScheduledTick").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub pos: BlockPos,
    pub block_id: u16,
    pub scheduled_time: i64,
}

impl ScheduledTick {
    const fn key(&self) -> (i32, i32, i32, u16) {
        (self.pos.x(), self.pos.y(), self.pos.z(), self.block_id)
    }
}

/// Heap entries ordered so the earliest `scheduled_time` is popped first;
/// ties broken by insertion sequence to keep the queue's behaviour stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    scheduled_time: i64,
    sequence: u64,
    tick: ScheduledTick,
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.scheduled_time, self.sequence).cmp(&(other.scheduled_time, other.sequence))
    }
}

/// The ordered, dedup-enforcing scheduled-tick queue owned by a [`World`](super::World).
#[derive(Debug, Default)]
pub struct ScheduledTickQueue {
    heap: BinaryHeap<Reverse<HeapEntry>>,
    keys: FxHashSet<(i32, i32, i32, u16)>,
    next_sequence: u64,
}

impl ScheduledTickQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue has no pending entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Schedules a tick, unless an entry with the same `(x, y, z, block_id)`
    /// key is already pending (§3 invariant, §8 "Re-scheduling an identical
    /// ... tick at the same scheduled-time is a no-op" — we drop the
    /// duplicate regardless of whether the scheduled time matches, matching
    /// the stated uniqueness invariant).
    pub fn schedule(&mut self, tick: ScheduledTick) {
        if !self.keys.insert(tick.key()) {
            return;
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(HeapEntry {
            scheduled_time: tick.scheduled_time,
            sequence,
            tick,
        }));
    }

    /// Drains every entry with `scheduled_time <= total_world_time`, capped
    /// at [`MAX_DRAIN_PER_TICK`]; the remainder of due entries, if any,
    /// stays queued in order for the next tick (§8 boundary behaviour).
    pub fn drain_due(&mut self, total_world_time: i64) -> Vec<ScheduledTick> {
        let mut drained = Vec::new();
        while drained.len() < MAX_DRAIN_PER_TICK {
            let Some(Reverse(top)) = self.heap.peek() else {
                break;
            };
            if top.scheduled_time > total_world_time {
                break;
            }
            let Reverse(entry) = self.heap.pop().expect("peeked entry must pop");
            self.keys.remove(&entry.tick.key());
            drained.push(entry.tick);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_at(x: i32, z: i32, block_id: u16, scheduled_time: i64) -> ScheduledTick {
        ScheduledTick {
            pos: BlockPos::new(x, 64, z),
            block_id,
            scheduled_time,
        }
    }

    #[test]
    fn duplicate_key_is_dropped() {
        let mut queue = ScheduledTickQueue::new();
        queue.schedule(tick_at(0, 0, 55, 10));
        queue.schedule(tick_at(0, 0, 55, 10));
        queue.schedule(tick_at(0, 0, 55, 50));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_respects_scheduled_time_and_order() {
        let mut queue = ScheduledTickQueue::new();
        queue.schedule(tick_at(0, 0, 1, 5));
        queue.schedule(tick_at(1, 0, 2, 3));
        queue.schedule(tick_at(2, 0, 3, 10));

        let due = queue.drain_due(5);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].block_id, 2);
        assert_eq!(due[1].block_id, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_caps_at_max_per_tick() {
        let mut queue = ScheduledTickQueue::new();
        for i in 0..(MAX_DRAIN_PER_TICK + 10) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            queue.schedule(tick_at(i as i32, 0, 1, 0));
        }
        let due = queue.drain_due(0);
        assert_eq!(due.len(), MAX_DRAIN_PER_TICK);
        assert_eq!(queue.len(), 10);
    }
}
