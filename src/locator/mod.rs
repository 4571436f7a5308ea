//! Node Locator
//!
//! Owns the known set of node addresses and maps each key to exactly one of
//! them. Two modes exist: a fixed list ([`StaticNodes`]) and ElastiCache-style
//! auto-discovery ([`ClusterNodes`]), which re-fetches topology from a
//! configuration endpoint on every call.
//!
//! ## Concurrency Model
//!
//! The node set is an `Arc<Vec<SocketAddr>>` behind a `parking_lot::RwLock`.
//! A refresh builds the new set outside the lock, then takes the write lock
//! only to swap the `Arc`. Readers clone the `Arc` under the read lock and
//! hash against that snapshot, so no lock is ever held across network I/O.
//!
//! Index assignment is `hash % len`, so the mapping depends on sequence
//! order: a refresh that reorders addresses remaps all keys, not just added
//! or removed ones.

mod hash;

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

pub use hash::{hash_key, HashAlgorithm};

use crate::error::{McError, Result};
use crate::network::Connection;
use crate::protocol::{read_cluster_config, ClusterConfig, Request};

/// Selects a node as a function of the item's key
///
/// Implementations must be safe for concurrent use from multiple threads.
pub trait ServerSelector: Send + Sync {
    /// Current node set, in routing order
    fn servers(&self) -> Result<Arc<Vec<SocketAddr>>>;

    /// The node that owns `key`
    fn pick_server(&self, key: &str) -> Result<SocketAddr>;
}

/// Resolve one `host:port` string to a socket address
pub fn resolve(server: &str) -> Result<SocketAddr> {
    server
        .to_socket_addrs()
        .map_err(|e| McError::Connection(format!("resolve {}: {}", server, e)))?
        .next()
        .ok_or_else(|| McError::Connection(format!("resolve {}: no addresses", server)))
}

/// Map a key onto a node set snapshot
///
/// A single node is returned unconditionally, keeping single-node
/// deployments independent of the hash. The modulo keeps the index in
/// range for any non-empty set; the bounds check is defensive only.
fn pick_from(
    addrs: &[SocketAddr],
    key: &str,
    algorithm: HashAlgorithm,
) -> Result<SocketAddr> {
    match addrs.len() {
        0 => Err(McError::NoAvailableServer),
        1 => Ok(addrs[0]),
        n => {
            let index = hash_key(key, algorithm) as usize % n;
            if index >= n {
                return Err(McError::InvalidServerIndex(index));
            }
            Ok(addrs[index])
        }
    }
}

// =============================================================================
// Static Mode
// =============================================================================

/// Locator over a fixed, explicitly configured node list
pub struct StaticNodes {
    /// Current node set; swapped wholesale, never mutated in place
    addrs: RwLock<Arc<Vec<SocketAddr>>>,

    /// Key-hashing algorithm
    algorithm: HashAlgorithm,
}

impl StaticNodes {
    /// Build a locator from `host:port` strings
    pub fn new<S: AsRef<str>>(servers: &[S], algorithm: HashAlgorithm) -> Result<Self> {
        let locator = Self {
            addrs: RwLock::new(Arc::new(Vec::new())),
            algorithm,
        };
        locator.set_nodes(servers)?;
        Ok(locator)
    }

    /// Resolve and swap in a new node set
    pub fn set_nodes<S: AsRef<str>>(&self, servers: &[S]) -> Result<()> {
        let addrs: Vec<SocketAddr> = servers
            .iter()
            .map(|s| resolve(s.as_ref()))
            .collect::<Result<_>>()?;

        *self.addrs.write() = Arc::new(addrs);
        Ok(())
    }
}

impl ServerSelector for StaticNodes {
    fn servers(&self) -> Result<Arc<Vec<SocketAddr>>> {
        Ok(Arc::clone(&self.addrs.read()))
    }

    fn pick_server(&self, key: &str) -> Result<SocketAddr> {
        let snapshot = Arc::clone(&self.addrs.read());
        pick_from(&snapshot, key, self.algorithm)
    }
}

// =============================================================================
// Cluster Mode
// =============================================================================

/// Locator that discovers its node set from a configuration endpoint
///
/// Topology is re-fetched on every `servers()` / `pick_server()` call; the
/// reported version is parsed but not used to skip redundant refreshes.
pub struct ClusterNodes {
    /// Configuration endpoint answering `config get cluster`
    endpoint: SocketAddr,

    /// Last-fetched node set
    addrs: RwLock<Arc<Vec<SocketAddr>>>,

    /// Key-hashing algorithm
    algorithm: HashAlgorithm,

    /// Deadline for topology queries
    timeout: Duration,
}

impl ClusterNodes {
    /// Build a locator around `endpoint` (a `host:port` string)
    pub fn new(endpoint: &str, algorithm: HashAlgorithm, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: resolve(endpoint)?,
            addrs: RwLock::new(Arc::new(Vec::new())),
            algorithm,
            timeout,
        })
    }

    /// The configuration endpoint address
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// Query the endpoint and swap in the freshly discovered node set
    ///
    /// The network fetch happens outside the lock; the swap is the only
    /// critical section.
    fn refresh(&self) -> Result<Arc<Vec<SocketAddr>>> {
        let config = fetch_cluster_config(self.endpoint, self.timeout)?;

        let addrs: Vec<SocketAddr> = config
            .hosts
            .iter()
            .map(|h| resolve(h))
            .collect::<Result<_>>()?;

        tracing::debug!(
            "Cluster topology v{}: {} node(s)",
            config.version,
            addrs.len()
        );

        let snapshot = Arc::new(addrs);
        *self.addrs.write() = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}

impl ServerSelector for ClusterNodes {
    fn servers(&self) -> Result<Arc<Vec<SocketAddr>>> {
        self.refresh()
    }

    fn pick_server(&self, key: &str) -> Result<SocketAddr> {
        let snapshot = self.refresh()?;
        pick_from(&snapshot, key, self.algorithm)
    }
}

/// Run one `config get cluster` round trip against `addr`
pub fn fetch_cluster_config(addr: SocketAddr, timeout: Duration) -> Result<ClusterConfig> {
    let mut conn = Connection::connect(addr, timeout)?;
    conn.send(&Request::ClusterConfig)?;
    read_cluster_config(conn.reader())
}
