//! A loaded chunk (§3 "Chunk ... a 16x256x16 column of blocks partitioned
//! into sixteen 16³ sections").

pub mod biome;
pub mod heightmap;
pub mod nbt;
pub mod section;

use terra_utils::ChunkPos;

use crate::entity::EntityId;
use biome::ChunkBiomes;
use heightmap::HeightMap;
use section::ChunkSection;

/// The number of vertical sections in a chunk (256 / 16).
pub const SECTION_COUNT: usize = 16;

/// An opaque, already-serialized tile entity or entity NBT blob plus its
/// local position — the concrete per-type fields are an external
/// collaborator's responsibility (§1); the chunk only owns the collection
/// and round-trips it intact (§8 "NBT chunk round-trip").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueNbtBlob {
    pub local_x: u8,
    pub y: i16,
    pub local_z: u8,
    pub type_key: String,
    pub nbt_data: Vec<u8>,
}

/// A persisted scheduled tick, carried alongside the chunk so reloading
/// doesn't lose due block updates (§6 "Chunk NBT" `TileTicks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedTick {
    pub local_x: u8,
    pub y: i16,
    pub local_z: u8,
    pub block_id: u16,
    pub scheduled_time: i64,
}

/// A loaded 16x256x16 chunk column.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub pos: ChunkPos,
    pub last_update: i64,
    pub terrain_populated: bool,
    pub is_populated: bool,
    pub dirty: bool,

    sections: [Option<ChunkSection>; SECTION_COUNT],
    heightmap: HeightMap,
    biomes: ChunkBiomes,

    pub entities: Vec<EntityId>,
    pub tile_entities: Vec<OpaqueNbtBlob>,
    pub tile_ticks: Vec<PersistedTick>,
}

impl Chunk {
    /// Creates an empty (all-air) chunk at the given position.
    #[must_use]
    pub fn empty(pos: ChunkPos) -> Self {
        Self {
            pos,
            last_update: 0,
            terrain_populated: false,
            is_populated: false,
            dirty: true,
            sections: std::array::from_fn(|_| None),
            heightmap: HeightMap::new(),
            biomes: ChunkBiomes::new(),
            entities: Vec::new(),
            tile_entities: Vec::new(),
            tile_ticks: Vec::new(),
        }
    }

    #[must_use]
    pub fn section(&self, y_index: usize) -> Option<&ChunkSection> {
        self.sections.get(y_index)?.as_ref()
    }

    pub fn section_mut(&mut self, y_index: usize) -> Option<&mut ChunkSection> {
        self.sections.get_mut(y_index)?.as_mut()
    }

    /// Returns a mutable reference to the section, creating an empty one if
    /// absent.
    pub fn section_or_create(&mut self, y_index: usize) -> &mut ChunkSection {
        self.sections[y_index].get_or_insert_with(|| ChunkSection::empty(y_index as u8))
    }

    #[must_use]
    pub fn sections(&self) -> &[Option<ChunkSection>; SECTION_COUNT] {
        &self.sections
    }

    pub fn set_sections(&mut self, sections: [Option<ChunkSection>; SECTION_COUNT]) {
        self.sections = sections;
    }

    #[must_use]
    pub const fn heightmap(&self) -> &HeightMap {
        &self.heightmap
    }

    pub fn heightmap_mut(&mut self) -> &mut HeightMap {
        &mut self.heightmap
    }

    #[must_use]
    pub const fn biomes(&self) -> &ChunkBiomes {
        &self.biomes
    }

    pub fn biomes_mut(&mut self) -> &mut ChunkBiomes {
        &mut self.biomes
    }

    /// The block id at block-local `(x, y, z)` coordinates (`x, z` in
    /// `[0, 16)`, `y` in `[0, 256)`), or air if the section is unloaded.
    #[must_use]
    pub fn block_id(&self, x: usize, y: usize, z: usize) -> u16 {
        let section_index = y / 16;
        self.section(section_index)
            .map_or(0, |s| s.block_id(x, y % 16, z))
    }

    /// Sets the block id at block-local coordinates, creating the backing
    /// section if needed, and marks the chunk dirty.
    pub fn set_block_id(&mut self, x: usize, y: usize, z: usize, id: u16) {
        let section_index = y / 16;
        self.section_or_create(section_index).set_block_id(x, y % 16, z, id);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_block_creates_its_section_lazily() {
        let mut chunk = Chunk::empty(ChunkPos::new(0, 0));
        assert!(chunk.section(4).is_none());
        chunk.set_block_id(1, 70, 1, 42);
        assert!(chunk.section(4).is_some());
        assert_eq!(chunk.block_id(1, 70, 1), 42);
        assert!(chunk.dirty);
    }

    #[test]
    fn unloaded_section_reads_as_air() {
        let chunk = Chunk::empty(ChunkPos::new(0, 0));
        assert_eq!(chunk.block_id(0, 200, 0), 0);
    }
}
