//! # memctl
//!
//! A memcached client library with:
//! - The line-oriented text wire protocol (get/set/delete/stats)
//! - Deterministic key-to-node routing over a fixed server list
//! - ElastiCache-style cluster auto-discovery from a configuration endpoint
//! - Item-dump introspection across slab buckets
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                                │
//! │        (get / set / delete / stats / dump / config)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ pick address
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Node Locator                               │
//! │        (StaticNodes / ClusterNodes, hash % n)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ open per call
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Connection  │◄────────►│ Wire Codec  │
//!   │ (TcpStream) │          │ (text proto)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! Connections live for exactly one operation; the locator's node-set lock
//! is the only shared mutable state.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod locator;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::Client;
pub use config::ClientConfig;
pub use error::{McError, Result};
pub use locator::HashAlgorithm;
pub use protocol::{ClusterConfig, Item, ItemMeta, StatsMap};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
