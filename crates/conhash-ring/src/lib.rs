//! Consistent hashing ring for mapping keys to a changing set of nodes.
//!
//! This crate implements a consistent hash ring that maps string keys to
//! named nodes. Adding or removing a node only remaps the keys that node
//! gained or owned, roughly `1/n` of the key space for `n` nodes.
//!
//! The ring uses virtual nodes (vnodes): each physical node gets `replicas`
//! positions on the ring, determined by `hash(decimal(index) ++ name)`.
//! More vnodes per node = more uniform distribution.
//!
//! [`HashRing`] is a plain single-threaded data structure. Wrap it in a lock
//! (or use the `conhash-shared` crate) before sharing it between threads.

mod config;
mod error;
pub mod hash;
mod ring;

pub use config::{DEFAULT_REPLICAS, RingConfig};
pub use error::RingError;
pub use hash::{HashAlgorithm, HashFn};
pub use ring::{HashRing, Movement};
