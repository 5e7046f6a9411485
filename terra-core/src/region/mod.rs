//! Chunk persistence as compressed NBT within 32x32 region files (§4.2).

pub mod file;
pub mod format;
pub mod manager;
pub mod worker;

pub use manager::RegionManager;
pub use worker::RegionWriteQueue;
