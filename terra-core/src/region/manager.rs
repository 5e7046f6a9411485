//! Cache of open region files plus the chunk quarantine list (§4.2, §7
//! "Persistence faults").
//!
//! A map of open regions behind a lock, with one per-region mutex so
//! reads/writes to different regions don't contend. This cache is
//! process-wide state, alongside the entity id allocator (§9 "Globals").

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use terra_utils::locks::SyncMutex;
use terra_utils::{ChunkPos, RegionPos};

use crate::chunk::nbt::{decode_chunk_bytes, encode_chunk_bytes};
use crate::chunk::Chunk;
use crate::error::RegionError;

use super::file::RegionFile;

/// The process-wide region-file cache and chunk quarantine list.
pub struct RegionManager {
    base_path: PathBuf,
    regions: SyncMutex<FxHashMap<RegionPos, Arc<SyncMutex<RegionFile>>>>,
    /// Chunks whose region payload failed to decode; saving them back is
    /// refused until [`Self::clear_quarantine`] runs (§7 "Persistent faults
    /// for a given chunk add it to a quarantine list preventing re-saving
    /// until manually cleared").
    quarantine: SyncMutex<FxHashSet<ChunkPos>>,
}

impl RegionManager {
    /// Creates a manager rooted at `base_path` (typically `<world>/region`).
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            regions: SyncMutex::new(FxHashMap::default()),
            quarantine: SyncMutex::new(FxHashSet::default()),
        }
    }

    fn region_handle(&self, pos: RegionPos) -> Result<Arc<SyncMutex<RegionFile>>, RegionError> {
        let mut regions = self.regions.lock();
        if let Some(existing) = regions.get(&pos) {
            return Ok(existing.clone());
        }
        std::fs::create_dir_all(&self.base_path)?;
        let path: &Path = &self.base_path;
        let file = RegionFile::open(&path.join(pos.file_name()))?;
        let handle = Arc::new(SyncMutex::new(file));
        regions.insert(pos, handle.clone());
        Ok(handle)
    }

    /// Loads a chunk, decompressing and decoding its NBT payload. A corrupt
    /// payload is logged, the chunk is quarantined, and `Ok(None)` is
    /// returned so the caller regenerates it (§7).
    pub fn load_chunk(&self, pos: ChunkPos) -> Result<Option<Chunk>, RegionError> {
        let region_pos = pos.region_pos();
        let (lx, lz) = pos.local_in_region();
        let handle = self.region_handle(region_pos)?;
        let bytes = {
            let mut region = handle.lock();
            region.read_chunk(lx, lz)
        };

        match bytes {
            Ok(Some(raw)) => match decode_chunk_bytes(pos, &raw) {
                Ok(chunk) => Ok(Some(chunk)),
                Err(RegionError::Corrupt { detail }) => {
                    tracing::error!(?pos, %detail, "corrupt chunk NBT, quarantining and regenerating");
                    self.quarantine.lock().insert(pos);
                    Ok(None)
                }
                Err(other) => Err(other),
            },
            Ok(None) => Ok(None),
            Err(RegionError::Corrupt { detail }) => {
                tracing::error!(?pos, %detail, "corrupt region payload, quarantining and regenerating");
                self.quarantine.lock().insert(pos);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Encodes and writes a chunk back to its region file. Refuses
    /// quarantined chunks (§7).
    pub fn save_chunk(&self, chunk: &Chunk) -> Result<(), RegionError> {
        if self.quarantine.lock().contains(&chunk.pos) {
            return Err(RegionError::Corrupt {
                detail: "chunk is quarantined, refusing to save".to_string(),
            });
        }
        let region_pos = chunk.pos.region_pos();
        let (lx, lz) = chunk.pos.local_in_region();
        let handle = self.region_handle(region_pos)?;
        let bytes = encode_chunk_bytes(chunk);
        let mut region = handle.lock();
        region.write_chunk(lx, lz, &bytes)
    }

    /// Whether a chunk is currently quarantined.
    #[must_use]
    pub fn is_quarantined(&self, pos: ChunkPos) -> bool {
        self.quarantine.lock().contains(&pos)
    }

    /// Manually clears a chunk's quarantine flag, allowing it to be saved
    /// again.
    pub fn clear_quarantine(&self, pos: ChunkPos) {
        self.quarantine.lock().remove(&pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_generated_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let manager = RegionManager::new(dir.path());

        let mut chunk = Chunk::empty(ChunkPos::new(2, -1));
        chunk.set_block_id(3, 70, 9, 15);
        manager.save_chunk(&chunk).unwrap();

        let loaded = manager.load_chunk(ChunkPos::new(2, -1)).unwrap().unwrap();
        assert_eq!(loaded.block_id(3, 70, 9), 15);
    }

    #[test]
    fn loading_an_absent_chunk_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let manager = RegionManager::new(dir.path());
        assert!(manager.load_chunk(ChunkPos::new(9, 9)).unwrap().is_none());
    }

    #[test]
    fn quarantined_chunk_refuses_to_save() {
        let dir = tempfile::tempdir().unwrap();
        let manager = RegionManager::new(dir.path());
        let chunk = Chunk::empty(ChunkPos::new(0, 0));
        manager.quarantine.lock().insert(chunk.pos);
        assert!(manager.save_chunk(&chunk).is_err());
    }
}
