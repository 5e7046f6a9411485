//! A single open region file: the 32x32 chunk grid, offset/timestamp
//! headers, and free-sector bitmap of §4.2.
//!
//! One file per region, rewritten in place when a chunk's new payload fits
//! its previous sector run; implements the spec's committed sector format
//! (§6) exactly, since §8 pins exact round-trip byte behavior to it.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::format::{self, SECTOR_SIZE};
use crate::error::RegionError;

const TABLE_ROWS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct OffsetEntry {
    sector_index: u32,
    sector_count: u32,
}

impl OffsetEntry {
    const fn is_present(self) -> bool {
        self.sector_count != 0
    }

    const fn pack(self) -> u32 {
        (self.sector_index << 8) | (self.sector_count & 0xFF)
    }

    const fn unpack(raw: u32) -> Self {
        Self {
            sector_index: raw >> 8,
            sector_count: raw & 0xFF,
        }
    }
}

/// An open `.mca`-shaped region file (§4.2).
pub struct RegionFile {
    file: std::fs::File,
    offsets: Box<[OffsetEntry; TABLE_ROWS]>,
    timestamps: Box<[u32; TABLE_ROWS]>,
    /// `true` at index `s` iff sector `s` is free. Rebuilt from the offset
    /// table on open (§4.2 invariant: "the free-sector bitmap is rebuilt by
    /// scanning the offset table; sectors 0 and 1 are marked not-free").
    free_sectors: Vec<bool>,
}

impl RegionFile {
    /// Opens (creating if absent) the region file at `path`.
    pub fn open(path: &Path) -> Result<Self, RegionError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();
        if len < (2 * SECTOR_SIZE) as u64 {
            file.set_len((2 * SECTOR_SIZE) as u64)?;
        }

        let mut header = vec![0u8; 2 * SECTOR_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut header)?;

        let mut offsets = Box::new([OffsetEntry::default(); TABLE_ROWS]);
        let mut timestamps = Box::new([0u32; TABLE_ROWS]);
        for i in 0..TABLE_ROWS {
            let raw = u32::from_be_bytes(header[i * 4..i * 4 + 4].try_into().unwrap());
            offsets[i] = OffsetEntry::unpack(raw);
            let traw = u32::from_be_bytes(
                header[SECTOR_SIZE + i * 4..SECTOR_SIZE + i * 4 + 4]
                    .try_into()
                    .unwrap(),
            );
            timestamps[i] = traw;
        }

        let total_len = file.metadata()?.len();
        if total_len % SECTOR_SIZE as u64 != 0 {
            return Err(RegionError::Corrupt {
                detail: format!("region file size {total_len} is not a multiple of {SECTOR_SIZE}"),
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let total_sectors = (total_len / SECTOR_SIZE as u64) as usize;
        let mut free_sectors = vec![true; total_sectors.max(2)];
        free_sectors[0] = false;
        free_sectors[1] = false;
        for entry in offsets.iter() {
            if entry.is_present() {
                let start = entry.sector_index as usize;
                let end = start + entry.sector_count as usize;
                if end > free_sectors.len() {
                    free_sectors.resize(end, true);
                }
                for slot in free_sectors.iter_mut().take(end).skip(start) {
                    *slot = false;
                }
            }
        }

        Ok(Self {
            file,
            offsets,
            timestamps,
            free_sectors,
        })
    }

    /// Reads and decompresses the chunk payload at local coordinates, or
    /// `None` if the slot has never been written (§4.2 "zero means 'not
    /// present'").
    pub fn read_chunk(&mut self, local_x: i32, local_z: i32) -> Result<Option<Vec<u8>>, RegionError> {
        let idx = format::local_index(local_x, local_z);
        let entry = self.offsets[idx];
        if !entry.is_present() {
            return Ok(None);
        }

        self.file
            .seek(SeekFrom::Start(u64::from(entry.sector_index) * SECTOR_SIZE as u64))?;
        let mut len_buf = [0u8; 4];
        self.file.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;
        if len == 0 {
            return Err(RegionError::Corrupt {
                detail: "zero-length chunk payload".to_string(),
            });
        }
        let mut tag_and_body = vec![0u8; len];
        self.file.read_exact(&mut tag_and_body)?;
        let tag = tag_and_body[0];
        let body = &tag_and_body[1..];

        let mut out = Vec::new();
        match tag {
            format::COMPRESSION_GZIP => {
                GzDecoder::new(body)
                    .read_to_end(&mut out)
                    .map_err(|e| RegionError::Corrupt { detail: e.to_string() })?;
            }
            format::COMPRESSION_ZLIB => {
                ZlibDecoder::new(body)
                    .read_to_end(&mut out)
                    .map_err(|e| RegionError::Corrupt { detail: e.to_string() })?;
            }
            other => {
                return Err(RegionError::Corrupt {
                    detail: format!("unknown compression tag {other}"),
                })
            }
        }
        Ok(Some(out))
    }

    /// Compresses and writes a chunk payload at local coordinates (§4.2
    /// "Write path").
    pub fn write_chunk(&mut self, local_x: i32, local_z: i32, payload: &[u8]) -> Result<(), RegionError> {
        let idx = format::local_index(local_x, local_z);

        let mut compressed = Vec::new();
        {
            let mut encoder = ZlibEncoder::new(&mut compressed, Compression::default());
            encoder.write_all(payload)?;
            encoder.finish()?;
        }

        // 4-byte length field (which itself stores `compressed.len() + 1`
        // for the tag byte) plus the tag byte plus the compressed bytes.
        let total_size = compressed.len() + 5;
        let sectors_needed = total_size.div_ceil(SECTOR_SIZE) as u32;
        if sectors_needed > format::MAX_SECTOR_COUNT {
            return Err(RegionError::ChunkTooLarge);
        }

        let old = self.offsets[idx];
        let start_sector = if old.is_present() && sectors_needed <= old.sector_count {
            let start = old.sector_index as usize;
            for slot in self
                .free_sectors
                .iter_mut()
                .skip(start + sectors_needed as usize)
                .take(old.sector_count as usize - sectors_needed as usize)
            {
                *slot = true;
            }
            old.sector_index
        } else {
            if old.is_present() {
                let start = old.sector_index as usize;
                let end = start + old.sector_count as usize;
                for slot in self.free_sectors.iter_mut().take(end).skip(start) {
                    *slot = true;
                }
            }
            self.allocate_run(sectors_needed)
        };

        let mut buf = vec![0u8; sectors_needed as usize * SECTOR_SIZE];
        let len_field = (compressed.len() + 1) as u32;
        buf[0..4].copy_from_slice(&len_field.to_be_bytes());
        buf[4] = format::COMPRESSION_ZLIB;
        buf[5..5 + compressed.len()].copy_from_slice(&compressed);

        self.file
            .seek(SeekFrom::Start(u64::from(start_sector) * SECTOR_SIZE as u64))?;
        self.file.write_all(&buf)?;

        let start = start_sector as usize;
        for slot in self.free_sectors.iter_mut().skip(start).take(sectors_needed as usize) {
            *slot = false;
        }

        self.offsets[idx] = OffsetEntry {
            sector_index: start_sector,
            sector_count: sectors_needed,
        };
        #[allow(clippy::cast_possible_truncation)]
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        self.timestamps[idx] = now;

        self.flush_header()?;
        self.file.flush()?;
        Ok(())
    }

    fn allocate_run(&mut self, needed: u32) -> u32 {
        let needed = needed as usize;
        let mut run_start = None;
        let mut run_len = 0usize;
        for (i, &free) in self.free_sectors.iter().enumerate().skip(2) {
            if free {
                if run_len == 0 {
                    run_start = Some(i);
                }
                run_len += 1;
                if run_len == needed {
                    return run_start.expect("run_start set when run_len > 0") as u32;
                }
            } else {
                run_len = 0;
                run_start = None;
            }
        }
        let append_at = self.free_sectors.len();
        self.free_sectors.resize(append_at + needed, false);
        append_at as u32
    }

    fn flush_header(&mut self) -> Result<(), RegionError> {
        let mut header = vec![0u8; 2 * SECTOR_SIZE];
        for i in 0..TABLE_ROWS {
            header[i * 4..i * 4 + 4].copy_from_slice(&self.offsets[i].pack().to_be_bytes());
            header[SECTOR_SIZE + i * 4..SECTOR_SIZE + i * 4 + 4]
                .copy_from_slice(&self.timestamps[i].to_be_bytes());
        }
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header)?;
        Ok(())
    }

    /// The total number of 4096-byte sectors tracked for this file (§8 "The
    /// sum of free sectors and assigned sectors in an open region file
    /// equals the file size divided by 4096").
    #[must_use]
    pub fn total_sector_count(&self) -> usize {
        self.free_sectors.len()
    }

    /// The number of sectors currently marked free.
    #[must_use]
    pub fn free_sector_count(&self) -> usize {
        self.free_sectors.iter().filter(|&&f| f).count()
    }

    /// The raw packed offset-table entry for local coordinates, as written
    /// to disk (§8 scenario 5).
    #[must_use]
    pub fn raw_offset_entry(&self, local_x: i32, local_z: i32) -> u32 {
        self.offsets[format::local_index(local_x, local_z)].pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.0.0.mca");
        let mut region = RegionFile::open(&path).unwrap();

        let payload = vec![0xABu8; 4321];
        region.write_chunk(5, 7, &payload).unwrap();

        let read_back = region.read_chunk(5, 7).unwrap().unwrap();
        assert_eq!(read_back, payload);
    }

    #[test]
    fn absent_chunk_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.0.0.mca");
        let mut region = RegionFile::open(&path).unwrap();
        assert!(region.read_chunk(1, 1).unwrap().is_none());
    }

    #[test]
    fn free_and_assigned_sectors_account_for_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.0.0.mca");
        let mut region = RegionFile::open(&path).unwrap();
        region.write_chunk(0, 0, &vec![1u8; 9000]).unwrap();
        region.write_chunk(1, 0, &vec![2u8; 50]).unwrap();

        let total = region.total_sector_count();
        let free = region.free_sector_count();
        let assigned = total - free;
        assert!(assigned >= 2 + 2); // header sectors + at least one per chunk
        assert_eq!(free + assigned, total);
    }

    #[test]
    fn rewriting_a_smaller_payload_frees_trailing_sectors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.0.0.mca");
        let mut region = RegionFile::open(&path).unwrap();
        region.write_chunk(0, 0, &vec![1u8; 9000]).unwrap();
        let free_before = region.free_sector_count();
        region.write_chunk(0, 0, &vec![1u8; 10]).unwrap();
        let free_after = region.free_sector_count();
        assert!(free_after > free_before);
    }
}
