#![allow(clippy::disallowed_types)]
//! Lock wrappers, kept as a single indirection point so the concurrency
//! primitive backing each of them can change without touching call sites.

/// A synchronous mutex.
pub type SyncMutex<T> = parking_lot::Mutex<T>;
/// A synchronous read-write lock.
pub type SyncRwLock<T> = parking_lot::RwLock<T>;

/// An asynchronous mutex, used by the region-file I/O actor (§5) to
/// serialize writes to a single `.mca` file without blocking the tick thread.
pub type AsyncMutex<T> = tokio::sync::Mutex<T>;
/// An asynchronous read-write lock.
pub type AsyncRwLock<T> = tokio::sync::RwLock<T>;
