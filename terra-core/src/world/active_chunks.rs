//! The active-chunk set (§3 "the active chunk set (chunks currently near
//! any player)", §5 "`§4.1` pass 5 iterates the active chunk set in
//! deterministic insertion order").

use indexmap::IndexSet;
use terra_utils::ChunkPos;

/// An insertion-ordered set of chunks eligible for random block ticking.
///
/// A chunk is active iff at least one player's view rectangle covers it
/// (§3 invariant). Using an insertion-ordered set, rather than a hash set,
/// is what makes pass 5's random-tick iteration order deterministic across
/// runs for the same sequence of adds/removes.
#[derive(Debug, Default)]
pub struct ActiveChunkSet {
    chunks: IndexSet<ChunkPos>,
}

impl ActiveChunkSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a chunk active. A no-op if already present (insertion order is
    /// preserved, not bumped).
    pub fn insert(&mut self, pos: ChunkPos) {
        self.chunks.insert(pos);
    }

    /// Marks a chunk no longer active.
    pub fn remove(&mut self, pos: ChunkPos) {
        self.chunks.shift_remove(&pos);
    }

    /// Whether `pos` is currently active.
    #[must_use]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains(&pos)
    }

    /// The number of active chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is currently active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates active chunks in deterministic insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_insertion_order_regardless_of_coordinates() {
        let mut set = ActiveChunkSet::new();
        set.insert(ChunkPos::new(5, 5));
        set.insert(ChunkPos::new(-2, 0));
        set.insert(ChunkPos::new(0, 0));

        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![ChunkPos::new(5, 5), ChunkPos::new(-2, 0), ChunkPos::new(0, 0)]
        );
    }

    #[test]
    fn removing_and_reinserting_moves_to_the_end() {
        let mut set = ActiveChunkSet::new();
        set.insert(ChunkPos::new(0, 0));
        set.insert(ChunkPos::new(1, 0));
        set.remove(ChunkPos::new(0, 0));
        set.insert(ChunkPos::new(0, 0));

        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![ChunkPos::new(1, 0), ChunkPos::new(0, 0)]);
    }
}
