//! Request definitions
//!
//! Represents the request forms sent to a cache node.

use bytes::Bytes;

/// A request to a cache node
#[derive(Debug, Clone)]
pub enum Request {
    /// Fetch a value by key
    Get { key: String },

    /// Store a key-value pair
    Set {
        key: String,
        flags: u16,
        expire: i64,
        value: Bytes,
    },

    /// Delete a key
    Delete { key: String },

    /// General or sub-scoped statistics (`stats`, `stats items`, ...)
    Stats { sub: Option<String> },

    /// Dump item metadata for one slab bucket
    CacheDump { bucket: u32, limit: u32 },

    /// Cluster topology query against a configuration endpoint
    ClusterConfig,
}

impl Request {
    /// Build the stats request for a named scope, or the general one.
    pub fn stats(sub: Option<&str>) -> Self {
        Request::Stats {
            sub: sub.map(str::to_owned),
        }
    }
}
