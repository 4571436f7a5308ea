//! Network Module
//!
//! Client-side TCP plumbing: one connection per operation, no pooling.

mod connection;

pub use connection::Connection;
