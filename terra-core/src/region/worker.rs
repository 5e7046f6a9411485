//! Off-simulation-thread region I/O (§5 "Region file I/O is off the
//! simulation thread: the simulation enqueues a (chunk, payload) write
//! request that a worker performs while holding the per-region-file lock").
//!
//! The simulation thread never blocks on disk I/O for a save; it sends the
//! chunk over an unbounded channel and a Tokio task drains it against the
//! shared [`RegionManager`], which already serializes per-region access.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::chunk::Chunk;

use super::manager::RegionManager;

/// A handle for enqueuing chunk saves to the background region-I/O worker.
#[derive(Clone)]
pub struct RegionWriteQueue {
    sender: mpsc::UnboundedSender<Chunk>,
}

impl RegionWriteQueue {
    /// Spawns the background worker task and returns a handle to enqueue
    /// writes to it. The task runs until every sender handle (including the
    /// one returned here) is dropped.
    #[must_use]
    pub fn spawn(regions: Arc<RegionManager>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Chunk>();
        tokio::spawn(async move {
            while let Some(chunk) = receiver.recv().await {
                let regions = regions.clone();
                let pos = chunk.pos;
                let result =
                    tokio::task::spawn_blocking(move || regions.save_chunk(&chunk)).await;
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        tracing::error!(?pos, error = %err, "chunk save failed, continuing (§7)");
                    }
                    Err(join_err) => {
                        tracing::error!(?pos, error = %join_err, "region save task panicked");
                    }
                }
            }
        });
        Self { sender }
    }

    /// Enqueues a chunk for asynchronous save. Never blocks the caller.
    pub fn enqueue_save(&self, chunk: Chunk) {
        // A closed receiver means the worker task has ended (e.g. during
        // shutdown); the save is simply dropped, matching §7's "abort"
        // semantics for persistence faults.
        let _ = self.sender.send(chunk);
    }
}
