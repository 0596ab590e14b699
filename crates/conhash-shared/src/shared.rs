//! Ring shared behind a reader/writer lock.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use conhash_ring::{HashRing, RingConfig, RingError};
use tracing::info;

/// A [`HashRing`] shared between threads behind an `RwLock`.
///
/// Cloning the handle is cheap; all clones see the same ring. Lookups return
/// owned names because the read guard is released before returning.
#[derive(Clone)]
pub struct SharedRing {
    ring: Arc<RwLock<HashRing>>,
}

impl SharedRing {
    /// Wrap an existing ring.
    pub fn new(ring: HashRing) -> Self {
        Self {
            ring: Arc::new(RwLock::new(ring)),
        }
    }

    /// Create an empty shared ring from configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        Ok(Self::new(HashRing::from_config(config)?))
    }

    /// Return a reference to the inner lock (for testing purposes).
    #[cfg(test)]
    pub(crate) fn inner(&self) -> &RwLock<HashRing> {
        &self.ring
    }

    // Ring mutations are staged before they touch the ring, so a writer that
    // panicked never left it half-updated. Recover instead of propagating.
    fn read(&self) -> RwLockReadGuard<'_, HashRing> {
        self.ring.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashRing> {
        self.ring.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add nodes to the ring. Returns the names that joined.
    pub fn add_nodes<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (joined, vnodes) = {
            let mut ring = self.write();
            let joined = ring.add_nodes(names);
            (joined, ring.len())
        };

        for name in &joined {
            info!(node = name.as_str(), vnodes, "node joined ring");
        }
        joined
    }

    /// Remove a node from the ring. Returns `false` if it was not present.
    pub fn remove_node(&self, name: &str) -> bool {
        let (removed, vnodes) = {
            let mut ring = self.write();
            (ring.remove_node(name), ring.len())
        };
        if removed {
            info!(node = name, vnodes, "node left ring");
        }
        removed
    }

    /// Return the node that owns `key`, or `None` if the ring is empty.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<String> {
        self.read().get(key).map(str::to_string)
    }

    /// Return up to `n` distinct nodes for `key`, in ring order.
    pub fn get_n<K: AsRef<[u8]>>(&self, key: K, n: usize) -> Vec<String> {
        self.read()
            .get_n(key, n)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Return a clone of the current ring.
    pub fn snapshot(&self) -> HashRing {
        self.read().clone()
    }

    /// Return the number of vnodes on the ring.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Return `true` if no node is on the ring.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Return all node names, sorted.
    pub fn nodes(&self) -> Vec<String> {
        self.read().nodes().map(str::to_string).collect()
    }
}

impl std::fmt::Debug for SharedRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRing")
            .field("ring", &*self.read())
            .finish()
    }
}
