//! Thread-safe access to a consistent hashing ring.
//!
//! This crate provides two ways to share a [`HashRing`] between threads:
//!
//! - [`SharedRing`]: the ring behind a reader/writer lock. Lookups take the
//!   read lock, membership changes take the write lock.
//! - [`SnapshotRing`]: immutable ring snapshots behind an atomically swapped
//!   pointer. Lookups never block; membership changes rebuild the ring.
//!
//! Both wrappers only ever publish fully updated rings.

mod shared;
mod snapshot;


pub use conhash_ring::{HashRing, RingConfig, RingError};
pub use shared::SharedRing;
pub use snapshot::SnapshotRing;
