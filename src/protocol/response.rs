//! Response definitions
//!
//! Typed views of what the server sends back.

use std::collections::HashMap;

use bytes::Bytes;

/// Per-node statistics: stat name to stat value, no ordering guarantee
pub type StatsMap = HashMap<String, String>;

/// A stored item returned by a `get` hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Key as echoed in the `VALUE` header line
    pub key: String,

    /// Opaque client flags stored alongside the value
    pub flags: u16,

    /// Value payload, exactly the declared byte length
    pub value: Bytes,
}

/// Item metadata from a `stats cachedump` scan
///
/// A diagnostic view, not a transfer unit: size is kept as the server's
/// string rendition of its unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMeta {
    pub key: String,
    pub size: String,
    pub expire: i64,
}

/// Cluster topology as reported by a configuration endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Monotonically increasing topology version
    pub version: u64,

    /// Node endpoints as `host:port` strings
    pub hosts: Vec<String>,
}
