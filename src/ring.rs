//! Consistent Hash Ring
//!
//! Maps keys to peer identities so that a membership change only moves the
//! keys owned by the peer that joined or left.
//!
//! ```text
//!   hash("0peerA") ─┐     hash("key") ──▶ first virtual node ≥ it
//!                   ▼                      (wrapping past the end)
//!   0 ──●────●────●──────●───●────●──── u32::MAX
//!       A    B    A      C   B    C
//! ```
//!
//! Each physical peer occupies `replicas` virtual positions on the ring.

use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64;

/// Default number of virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

/// Hash function used to place peers and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default ring hash: XXH3-64 folded to 32 bits.
///
/// Ownership is agreed on by every node, so the hash must not depend on the
/// toolchain or the process. XXH3 output is fixed by its published algorithm.
pub fn default_hash(data: &[u8]) -> u32 {
    let hash = xxh3_64(data);
    (hash ^ (hash >> 32)) as u32
}

// == Hash Ring ==
/// Sorted virtual-node hashes, each owned by one physical peer.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual-node hashes
    keys: Vec<u32>,
    /// Virtual-node hash -> peer id
    owners: HashMap<u32, String>,
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}

impl HashRing {
    /// Creates an empty ring. `hash` defaults to [`default_hash`], and a
    /// replica count of zero is raised to one.
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(default_hash),
            replicas: replicas.max(1),
            keys: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Adds peers to the ring, keeping the virtual-node hashes sorted.
    fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.keys.push(hash);
                self.owners.insert(hash, peer.to_string());
            }
        }
        self.keys.sort_unstable();
        self.keys.dedup();
    }

    /// Rebuilds the ring from scratch with exactly `peers`.
    pub fn set_peers<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keys.clear();
        self.owners.clear();
        self.add(peers);
    }

    /// Returns the peer owning `key`, or None if the ring is empty.
    pub fn locate(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&h| h < hash) % self.keys.len();
        self.owners.get(&self.keys[idx]).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}
