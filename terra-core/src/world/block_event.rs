//! Two-buffer block-event scheme (§4.1 stage 7 "Block-event flush").
//!
//! Events raised mid-tick (piston extend/retract, note-block play, chest
//! open/close) accumulate in the write-side buffer; at the end of the tick
//! the draining buffer is flushed to the external event consumer (§1, §6)
//! and the two buffers swap, so events raised *during* the flush land in a
//! fresh buffer rather than being observed twice or dropped.

use terra_utils::BlockPos;

/// A block-level event awaiting flush to the external event consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEvent {
    pub pos: BlockPos,
    pub event_id: i32,
    pub event_data: i32,
    pub block_id: u16,
}

/// The double-buffered event queue (§4.1 stage 7, §5 "Block events emit
/// last").
#[derive(Debug, Default)]
pub struct BlockEventBuffer {
    buffers: [Vec<BlockEvent>; 2],
    active: usize,
}

impl BlockEventBuffer {
    /// Creates an empty buffer pair.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the currently-accepting buffer.
    pub fn push(&mut self, event: BlockEvent) {
        self.buffers[self.active].push(event);
    }

    /// Swaps buffers and returns every event collected in the now-draining
    /// side, ready for the external event consumer.
    pub fn flush(&mut self) -> Vec<BlockEvent> {
        let draining = self.active;
        self.active = 1 - self.active;
        std::mem::take(&mut self.buffers[draining])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_returns_only_events_pushed_before_it_and_swaps() {
        let mut buffer = BlockEventBuffer::new();
        buffer.push(BlockEvent {
            pos: BlockPos::new(0, 0, 0),
            event_id: 1,
            event_data: 0,
            block_id: 1,
        });
        let flushed = buffer.flush();
        assert_eq!(flushed.len(), 1);

        buffer.push(BlockEvent {
            pos: BlockPos::new(1, 0, 0),
            event_id: 2,
            event_data: 0,
            block_id: 1,
        });
        let flushed_again = buffer.flush();
        assert_eq!(flushed_again.len(), 1);
        assert_eq!(flushed_again[0].event_id, 2);
    }
}
