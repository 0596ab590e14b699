//! Consistent hashing ring implementation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::RingConfig;
use crate::error::RingError;
use crate::hash::{self, HashFn};

/// One virtual position on the ring.
///
/// Ordered by position, then by node name, so that two nodes colliding on the
/// same position keep separate entries and resolve deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Vnode {
    position: u32,
    node: Arc<str>,
}

/// A key whose owner differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    /// The key that moves.
    pub key: String,
    /// The node that owned it before, if the old ring had any nodes.
    pub from: Option<String>,
    /// The node that owns it after, if the new ring has any nodes.
    pub to: Option<String>,
}

/// Consistent hashing ring mapping keys to node names.
///
/// Each node is mapped to `replicas` virtual nodes (vnodes) on a `u32` ring.
/// A key is owned by the first vnode at or clockwise after the key's hash,
/// wrapping from the largest position back to the smallest.
#[derive(Clone)]
pub struct HashRing {
    /// Ring entries, sorted ascending by `(position, node)`.
    vnodes: Vec<Vnode>,
    /// Physical nodes currently on the ring.
    nodes: BTreeSet<Arc<str>>,
    /// Virtual positions per physical node.
    replicas: usize,
    hash: HashFn,
}

impl HashRing {
    /// Create an empty ring using the default CRC32 hash.
    pub fn new(replicas: usize) -> Result<Self, RingError> {
        Self::with_hasher(replicas, hash::crc32_ieee)
    }

    /// Create an empty ring with an explicit hash function.
    ///
    /// The same function places both vnodes and keys, so it must be
    /// deterministic.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::InvalidReplicaCount(replicas));
        }
        Ok(Self {
            vnodes: Vec::new(),
            nodes: BTreeSet::new(),
            replicas,
            hash,
        })
    }

    /// Create an empty ring from configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        Self::with_hasher(config.replicas, config.hash.hasher())
    }

    /// Add nodes to the ring.
    ///
    /// Every new node gets `replicas` vnodes. Names already on the ring, or
    /// repeated within `names`, are skipped. Returns the names that joined,
    /// in input order.
    pub fn add_nodes<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut staged = Vec::new();
        let mut added: Vec<Arc<str>> = Vec::new();

        for name in names {
            let name = name.as_ref();
            if self.nodes.contains(name) || added.iter().any(|n| &**n == name) {
                continue;
            }
            let node: Arc<str> = Arc::from(name);
            for position in vnode_positions(self.hash, self.replicas, name) {
                staged.push(Vnode {
                    position,
                    node: Arc::clone(&node),
                });
            }
            added.push(node);
        }

        if added.is_empty() {
            return Vec::new();
        }

        self.vnodes.append(&mut staged);
        self.vnodes.sort_unstable();
        self.vnodes.dedup();
        self.nodes.extend(added.iter().cloned());

        debug!(
            nodes = added.len(),
            vnodes = self.vnodes.len(),
            "added nodes to ring"
        );
        added.iter().map(|n| n.to_string()).collect()
    }

    /// Add a single node to the ring. Returns `false` if it was already present.
    pub fn add_node(&mut self, name: &str) -> bool {
        !self.add_nodes([name]).is_empty()
    }

    /// Remove a node from the ring.
    ///
    /// Only this node's vnodes are removed, even where another node hashed to
    /// the same position. Returns `false` if the node was not on the ring.
    pub fn remove_node(&mut self, name: &str) -> bool {
        if !self.nodes.remove(name) {
            return false;
        }

        let mut positions: Vec<u32> = vnode_positions(self.hash, self.replicas, name).collect();
        positions.sort_unstable();

        let before = self.vnodes.len();
        self.vnodes.retain(|v| {
            !(&*v.node == name && positions.binary_search(&v.position).is_ok())
        });

        debug!(
            node = name,
            removed = before - self.vnodes.len(),
            vnodes = self.vnodes.len(),
            "removed node from ring"
        );
        true
    }

    /// Return the node that owns `key`, or `None` if the ring is empty.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&str> {
        let idx = self.successor(key.as_ref())?;
        self.vnodes.get(idx).map(|v| &*v.node)
    }

    /// Return up to `n` distinct nodes for `key`, in ring order.
    ///
    /// Walks clockwise from the key's position collecting distinct physical
    /// nodes. The first entry is always the same as [`HashRing::get`]. If
    /// fewer than `n` nodes exist, returns all of them.
    pub fn get_n<K: AsRef<[u8]>>(&self, key: K, n: usize) -> Vec<&str> {
        let Some(start) = self.successor(key.as_ref()) else {
            return Vec::new();
        };

        let max_distinct = n.min(self.nodes.len());
        let mut owners: Vec<&str> = Vec::with_capacity(max_distinct);
        if max_distinct == 0 {
            return owners;
        }

        let (before, after) = self.vnodes.split_at(start);
        for vnode in after.iter().chain(before) {
            let node = &*vnode.node;
            if !owners.contains(&node) {
                owners.push(node);
                if owners.len() == max_distinct {
                    break;
                }
            }
        }

        owners
    }

    /// Compute which keys change owner between two ring states.
    ///
    /// Only produces a plan; moving the data is up to the caller.
    pub fn diff<I, K>(old: &HashRing, new: &HashRing, keys: I) -> Vec<Movement>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut movements = Vec::new();

        for key in keys {
            let key = key.as_ref();
            let from = old.get(key);
            let to = new.get(key);
            if from != to {
                movements.push(Movement {
                    key: key.to_string(),
                    from: from.map(str::to_string),
                    to: to.map(str::to_string),
                });
            }
        }

        movements
    }

    /// Index of the first vnode at or after `key`'s hash, wrapping to 0.
    fn successor(&self, key: &[u8]) -> Option<usize> {
        if self.vnodes.is_empty() {
            return None;
        }
        let h = (self.hash)(key);
        let idx = self.vnodes.partition_point(|v| v.position < h);
        Some(idx % self.vnodes.len())
    }

    /// Return the number of vnodes on the ring.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    /// Return `true` if no node is on the ring.
    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// Return the number of physical nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if `name` is on the ring.
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// Return all node names, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| &**n)
    }

    /// Return all ring positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = u32> {
        self.vnodes.iter().map(|v| v.position)
    }

    /// Return all `(position, node)` entries in ring order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> {
        self.vnodes.iter().map(|v| (v.position, &*v.node))
    }

    /// Return the configured replica count.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Return the hash function used by this ring.
    pub fn hasher(&self) -> HashFn {
        self.hash
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("nodes", &self.nodes)
            .field("vnodes", &self.vnodes.len())
            .finish_non_exhaustive()
    }
}

/// Compute a node's vnode positions: `hash(decimal(index) ++ name)`.
fn vnode_positions(hash: HashFn, replicas: usize, name: &str) -> impl Iterator<Item = u32> {
    let mut key = String::with_capacity(name.len() + 4);
    (0..replicas).map(move |i| {
        key.clear();
        key.push_str(&i.to_string());
        key.push_str(name);
        hash(key.as_bytes())
    })
}
