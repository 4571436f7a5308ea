//! Client
//!
//! The public-facing façade. Each operation picks a node, opens a fresh
//! connection to it, drives the codec, and drops the connection; nothing is
//! pooled or retried. Cluster-wide operations run the single-node operation
//! against every known node in address order and fail fast on the first
//! member error, returning no partial results.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{McError, Result};
use crate::locator::{fetch_cluster_config, ClusterNodes, ServerSelector, StaticNodes};
use crate::network::Connection;
use crate::protocol::{
    item_bucket_counts, read_delete_response, read_get_response, read_item_dump,
    read_set_response, read_stats_response, ClusterConfig, Item, ItemMeta, Request, StatsMap,
};

enum Selector {
    Static(StaticNodes),
    Cluster(ClusterNodes),
}

impl Selector {
    fn servers(&self) -> Result<Arc<Vec<SocketAddr>>> {
        match self {
            Selector::Static(nodes) => nodes.servers(),
            Selector::Cluster(nodes) => nodes.servers(),
        }
    }

    fn pick_server(&self, key: &str) -> Result<SocketAddr> {
        match self {
            Selector::Static(nodes) => nodes.pick_server(key),
            Selector::Cluster(nodes) => nodes.pick_server(key),
        }
    }
}

/// A memcached client over one or more nodes
pub struct Client {
    selector: Selector,
    config: ClientConfig,
}

impl Client {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Client over a fixed list of `host:port` servers, default config
    pub fn new<S: AsRef<str>>(servers: &[S]) -> Result<Self> {
        Self::with_config(servers, ClientConfig::default())
    }

    /// Client over a fixed server list with explicit configuration
    pub fn with_config<S: AsRef<str>>(servers: &[S], config: ClientConfig) -> Result<Self> {
        let nodes = StaticNodes::new(servers, config.hash_algorithm)?;
        Ok(Self {
            selector: Selector::Static(nodes),
            config,
        })
    }

    /// Auto-discovering client around a configuration endpoint, default config
    pub fn new_cluster(endpoint: &str) -> Result<Self> {
        Self::cluster_with_config(endpoint, ClientConfig::default())
    }

    /// Auto-discovering client with explicit configuration
    pub fn cluster_with_config(endpoint: &str, config: ClientConfig) -> Result<Self> {
        let nodes = ClusterNodes::new(
            endpoint,
            config.hash_algorithm,
            config.control_timeout(),
        )?;
        Ok(Self {
            selector: Selector::Cluster(nodes),
            config,
        })
    }

    // =========================================================================
    // Single-Key Operations
    // =========================================================================

    /// Fetch the item stored under `key`
    ///
    /// A miss is [`McError::CacheMiss`].
    pub fn get(&self, key: &str) -> Result<Item> {
        let mut conn = self.connect_for_key(key, self.config.data_timeout())?;
        conn.send(&Request::Get {
            key: key.to_string(),
        })?;
        read_get_response(conn.reader())
    }

    /// Store `value` under `key`
    ///
    /// `flags` are opaque to the server; `expire` is in seconds, 0 meaning
    /// no expiry.
    pub fn set(&self, key: &str, value: impl Into<Bytes>, flags: u16, expire: i64) -> Result<()> {
        let mut conn = self.connect_for_key(key, self.config.data_timeout())?;
        conn.send(&Request::Set {
            key: key.to_string(),
            flags,
            expire,
            value: value.into(),
        })?;
        read_set_response(conn.reader())
    }

    /// Delete `key`
    ///
    /// Deleting an absent key is [`McError::KeyNotFound`].
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connect_for_key(key, self.config.data_timeout())?;
        conn.send(&Request::Delete {
            key: key.to_string(),
        })?;
        read_delete_response(conn.reader())
    }

    // =========================================================================
    // Cluster-Wide Operations
    // =========================================================================

    /// General statistics from every node, in address order
    pub fn stats(&self) -> Result<Vec<StatsMap>> {
        self.cluster_stats(None)
    }

    /// Per-slab item statistics from every node
    pub fn stats_items(&self) -> Result<Vec<StatsMap>> {
        self.cluster_stats(Some("items"))
    }

    /// Slab allocator statistics from every node
    pub fn stats_slabs(&self) -> Result<Vec<StatsMap>> {
        self.cluster_stats(Some("slabs"))
    }

    /// Runtime settings from every node
    pub fn stats_settings(&self) -> Result<Vec<StatsMap>> {
        self.cluster_stats(Some("settings"))
    }

    /// Dump item metadata from every node, in address order
    ///
    /// Each node's result is one map keyed by item key, aggregated across
    /// that node's slab buckets.
    pub fn cluster_dump_items(&self) -> Result<Vec<HashMap<String, ItemMeta>>> {
        let servers = self.selector.servers()?;
        servers
            .iter()
            .map(|&addr| self.dump_items(addr))
            .collect()
    }

    /// Current topology as reported by the configuration endpoint
    ///
    /// A static client asks its first server, matching the behavior of
    /// querying any cluster member directly.
    pub fn cluster_config(&self) -> Result<ClusterConfig> {
        let addr = match &self.selector {
            Selector::Cluster(nodes) => nodes.endpoint(),
            Selector::Static(nodes) => *nodes
                .servers()?
                .first()
                .ok_or(McError::NoAvailableServer)?,
        };
        fetch_cluster_config(addr, self.config.control_timeout())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn connect_for_key(&self, key: &str, timeout: Duration) -> Result<Connection> {
        let addr = self.selector.pick_server(key)?;
        Connection::connect(addr, timeout)
    }

    fn cluster_stats(&self, sub: Option<&str>) -> Result<Vec<StatsMap>> {
        let servers = self.selector.servers()?;
        servers
            .iter()
            .map(|&addr| self.stats_one(addr, sub))
            .collect()
    }

    fn stats_one(&self, addr: SocketAddr, sub: Option<&str>) -> Result<StatsMap> {
        let mut conn = Connection::connect(addr, self.config.control_timeout())?;
        conn.send(&Request::stats(sub))?;
        read_stats_response(conn.reader())
    }

    /// Scan one node: learn per-bucket item counts from `stats items`, then
    /// cachedump each non-empty bucket over the same connection.
    fn dump_items(&self, addr: SocketAddr) -> Result<HashMap<String, ItemMeta>> {
        let mut conn = Connection::connect(addr, self.config.control_timeout())?;

        conn.send(&Request::stats(Some("items")))?;
        let stats = read_stats_response(conn.reader())?;

        let mut buckets: Vec<(u32, u64)> = item_bucket_counts(&stats)?
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .collect();
        buckets.sort_unstable();

        let mut items = HashMap::new();
        for (bucket, count) in buckets {
            let limit = u32::try_from(count).unwrap_or(u32::MAX);
            conn.send(&Request::CacheDump { bucket, limit })?;
            read_item_dump(conn.reader(), &mut items)?;
        }

        Ok(items)
    }
}
