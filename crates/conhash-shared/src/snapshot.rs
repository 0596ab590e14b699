//! Copy-on-write ring with lock-free readers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use conhash_ring::{HashRing, RingConfig, RingError};
use tracing::info;

/// A [`HashRing`] published as immutable snapshots.
///
/// Readers load the current snapshot without locking and may keep it for as
/// long as they like. Each membership change clones the ring, applies the
/// change, and swaps the new ring in; membership changes are expected to be
/// rare compared to lookups.
#[derive(Clone)]
pub struct SnapshotRing {
    /// Current ring snapshot.
    ///
    /// Writers replace it with `rcu`, so concurrent writers retry on top of
    /// each other's changes instead of overwriting them.
    ring: Arc<ArcSwap<HashRing>>,
}

impl SnapshotRing {
    /// Publish an existing ring as the first snapshot.
    pub fn new(ring: HashRing) -> Self {
        Self {
            ring: Arc::new(ArcSwap::from_pointee(ring)),
        }
    }

    /// Create an empty snapshot ring from configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        Ok(Self::new(HashRing::from_config(config)?))
    }

    /// Return the current snapshot.
    pub fn load(&self) -> Arc<HashRing> {
        self.ring.load_full()
    }

    /// Add nodes and publish the resulting ring. Returns the names that joined.
    pub fn add_nodes<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        let mut joined = Vec::new();
        let mut vnodes = 0;
        self.ring.rcu(|current| {
            let mut next = HashRing::clone(current);
            joined = next.add_nodes(&names);
            vnodes = next.len();
            next
        });

        for name in &joined {
            info!(node = name.as_str(), vnodes, "node joined ring");
        }
        joined
    }

    /// Remove a node and publish the resulting ring.
    ///
    /// Returns `false` if the node was not present.
    pub fn remove_node(&self, name: &str) -> bool {
        if !self.ring.load().contains_node(name) {
            return false;
        }

        let mut removed = false;
        let mut vnodes = 0;
        self.ring.rcu(|current| {
            let mut next = HashRing::clone(current);
            removed = next.remove_node(name);
            vnodes = next.len();
            next
        });

        if removed {
            info!(node = name, vnodes, "node left ring");
        }
        removed
    }

    /// Return the node that owns `key` in the current snapshot.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<String> {
        self.ring.load().get(key).map(str::to_string)
    }

    /// Return up to `n` distinct nodes for `key` in the current snapshot.
    pub fn get_n<K: AsRef<[u8]>>(&self, key: K, n: usize) -> Vec<String> {
        self.ring
            .load()
            .get_n(key, n)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Return the number of vnodes in the current snapshot.
    pub fn len(&self) -> usize {
        self.ring.load().len()
    }

    /// Return `true` if the current snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ring.load().is_empty()
    }
}

impl std::fmt::Debug for SnapshotRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRing")
            .field("ring", &**self.ring.load())
            .finish()
    }
}
