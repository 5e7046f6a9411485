//! Per-chunk watcher records (§4.3 "`PlayerInstance`").

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use terra_utils::ChunkPos;

use crate::entity::EntityId;

/// Once more than this many block changes accumulate in a chunk within one
/// tick, the instance switches to whole-chunk resend mode (§4.3).
pub const MAX_BLOCK_CHANGES: usize = 64;

/// A single pending block change, packed as `lx | lz<<4 | y<<8` (§4.3
/// "up to 64 recently-changed block positions encoded as
/// `lx | lz<<4 | y<<8`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedBlockChange(pub u16);

impl EncodedBlockChange {
    #[must_use]
    pub const fn new(local_x: u8, y: u8, local_z: u8) -> Self {
        Self((local_x as u16 & 0xF) | ((local_z as u16 & 0xF) << 4) | ((y as u16) << 8))
    }

    #[must_use]
    pub const fn local_x(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    #[must_use]
    pub const fn local_z(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    #[must_use]
    pub const fn y(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

/// The update a dirty instance owes its watchers this tick (§4.3
/// "Block-change propagation").
#[derive(Debug, Clone)]
pub enum ChunkUpdate {
    /// A single block changed.
    SingleBlock(EncodedBlockChange),
    /// Multiple (but `<= 64`) blocks changed.
    BlockList(SmallVec<[EncodedBlockChange; MAX_BLOCK_CHANGES]>),
    /// More than 64 changes accumulated, or a forced resync: resend the
    /// whole chunk.
    FullResend,
}

/// A chunk's watcher record: who's watching, and what changed since the
/// last flush (§4.3 "`PlayerInstance`").
pub struct PlayerInstance {
    pub pos: ChunkPos,
    watchers: FxHashSet<EntityId>,
    dirty: bool,
    full_resend: bool,
    changes: SmallVec<[EncodedBlockChange; MAX_BLOCK_CHANGES]>,
}

impl PlayerInstance {
    #[must_use]
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            watchers: FxHashSet::default(),
            dirty: false,
            full_resend: false,
            changes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn watchers(&self) -> &FxHashSet<EntityId> {
        &self.watchers
    }

    pub fn add_watcher(&mut self, player: EntityId) -> bool {
        self.watchers.insert(player)
    }

    /// Removes a watcher, returning whether the instance now has none left.
    pub fn remove_watcher(&mut self, player: EntityId) -> bool {
        self.watchers.remove(&player);
        self.watchers.is_empty()
    }

    /// Records that a block changed at local coordinates, switching to
    /// whole-chunk resend mode once the 64-entry cap is exceeded.
    pub fn record_change(&mut self, local_x: u8, y: u8, local_z: u8) {
        self.dirty = true;
        if self.full_resend {
            return;
        }
        if self.changes.len() >= MAX_BLOCK_CHANGES {
            self.full_resend = true;
            self.changes.clear();
            return;
        }
        self.changes.push(EncodedBlockChange::new(local_x, y, local_z));
    }

    /// Forces a resend on the next flush regardless of accumulated changes
    /// (§4.3 "Full resync").
    pub fn force_resync(&mut self) {
        self.dirty = true;
        self.full_resend = true;
    }

    /// Drains this tick's update, if the instance is dirty.
    pub fn drain_update(&mut self) -> Option<ChunkUpdate> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        if self.full_resend {
            self.full_resend = false;
            self.changes.clear();
            return Some(ChunkUpdate::FullResend);
        }
        let changes = std::mem::take(&mut self.changes);
        match changes.len() {
            0 => None,
            1 => Some(ChunkUpdate::SingleBlock(changes[0])),
            _ => Some(ChunkUpdate::BlockList(changes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_than_64_changes_switches_to_full_resend() {
        let mut instance = PlayerInstance::new(ChunkPos::new(0, 0));
        for i in 0..65u8 {
            instance.record_change(i % 16, 64, 0);
        }
        match instance.drain_update() {
            Some(ChunkUpdate::FullResend) => {}
            other => panic!("expected FullResend, got {other:?}"),
        }
    }

    #[test]
    fn single_change_is_not_wrapped_in_a_list() {
        let mut instance = PlayerInstance::new(ChunkPos::new(0, 0));
        instance.record_change(1, 64, 2);
        match instance.drain_update() {
            Some(ChunkUpdate::SingleBlock(c)) => {
                assert_eq!(c.local_x(), 1);
                assert_eq!(c.y(), 64);
                assert_eq!(c.local_z(), 2);
            }
            other => panic!("expected SingleBlock, got {other:?}"),
        }
    }
}

impl std::fmt::Debug for ChunkUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleBlock(c) => write!(f, "SingleBlock({c:?})"),
            Self::BlockList(list) => write!(f, "BlockList(len={})", list.len()),
            Self::FullResend => write!(f, "FullResend"),
        }
    }
}
