//! Protocol Module
//!
//! Defines the memcached text wire protocol spoken to each node.
//!
//! ## Protocol Format
//!
//! Requests are single `\r\n`-terminated lines; only `set` carries a binary
//! payload after its command line:
//!
//! ```text
//! get <key>\r\n
//! set <key> <flags> <expire> <len>\r\n<value bytes>\r\n
//! delete <key>\r\n
//! stats[ <sub>]\r\n
//! stats cachedump <bucket> <limit>\r\n
//! config get cluster\r\n
//! ```
//!
//! Responses are line-oriented. Multi-line responses (stats, cachedump,
//! cluster config) are terminated by an `END\r\n` marker; a `get` hit embeds
//! a length-delimited value between its `VALUE` header line and the marker,
//! so the value may itself contain `\r\n`.

mod codec;
mod command;
mod response;

pub use codec::{
    encode_request, item_bucket_counts, read_cluster_config, read_delete_response,
    read_get_response, read_item_dump, read_set_response, read_stats_response,
};
pub use command::Request;
pub use response::{ClusterConfig, Item, ItemMeta, StatsMap};

/// Normal-completion marker for multi-line responses
pub const END_MARKER: &str = "END";

/// Explicit server-side error line
pub const ERROR_MARKER: &str = "ERROR";

/// Successful set
pub const STORED: &str = "STORED";

/// Successful delete
pub const DELETED: &str = "DELETED";

/// Delete on an absent key
pub const NOT_FOUND: &str = "NOT_FOUND";
