//! Region file binary layout constants (§4.2, §6 "Region file format").

/// Bytes per sector. Sectors 0 and 1 are the offset and timestamp headers;
/// sectors 2+ hold chunk payloads.
pub const SECTOR_SIZE: usize = 4096;

/// Chunks per region side; a region is a 32x32 chunk grid.
pub const REGION_SIDE: i32 = 32;

/// A sector-count field is a single byte, so a chunk payload can occupy at
/// most this many sectors (§4.2 "capped at 255").
pub const MAX_SECTOR_COUNT: u32 = 255;

/// Compression tag for gzip-compressed payloads.
pub const COMPRESSION_GZIP: u8 = 1;
/// Compression tag for zlib-compressed payloads, the one this crate writes.
pub const COMPRESSION_ZLIB: u8 = 2;

/// The offset-table/timestamp-table row index for a chunk's local-in-region
/// coordinates (§4.2 "Sector 0: ... Each entry").
#[must_use]
pub const fn local_index(local_x: i32, local_z: i32) -> usize {
    (local_z as usize) * REGION_SIDE as usize + local_x as usize
}
