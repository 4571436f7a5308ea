//! Protocol codec
//!
//! Encoding and decoding functions for the memcached text protocol.
//!
//! Every response is consumed line-by-line off a buffered stream; the one
//! place that needs a byte-exact sub-read is the `get` value payload, which
//! may itself contain `\r\n`. All numeric fields are decimal ASCII and a
//! malformed numeral is always a hard parse error, never silently defaulted.

use std::collections::HashMap;
use std::io::BufRead;

use bytes::Bytes;

use super::{ClusterConfig, Item, ItemMeta, Request, StatsMap};
use super::{DELETED, END_MARKER, ERROR_MARKER, NOT_FOUND, STORED};
use crate::error::{McError, Result};

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to wire bytes
///
/// All request lines are `\r\n`-terminated; `set` is the only form that
/// appends a binary payload (itself `\r\n`-terminated) after its command line.
pub fn encode_request(request: &Request) -> Vec<u8> {
    match request {
        Request::Get { key } => format!("get {}\r\n", key).into_bytes(),
        Request::Set {
            key,
            flags,
            expire,
            value,
        } => {
            let header = format!("set {} {} {} {}\r\n", key, flags, expire, value.len());
            let mut message = Vec::with_capacity(header.len() + value.len() + 2);
            message.extend_from_slice(header.as_bytes());
            message.extend_from_slice(value);
            message.extend_from_slice(b"\r\n");
            message
        }
        Request::Delete { key } => format!("delete {}\r\n", key).into_bytes(),
        Request::Stats { sub } => match sub {
            Some(sub) => format!("stats {}\r\n", sub).into_bytes(),
            None => b"stats\r\n".to_vec(),
        },
        Request::CacheDump { bucket, limit } => {
            format!("stats cachedump {} {}\r\n", bucket, limit).into_bytes()
        }
        Request::ClusterConfig => b"config get cluster\r\n".to_vec(),
    }
}

// =============================================================================
// Line Reading
// =============================================================================

/// Read one `\r\n`-terminated line, returning it without the terminator
///
/// A bare `\n` terminator is tolerated; EOF before any terminator is a
/// protocol error because every response grammar ends with a marker line.
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    let n = reader
        .read_until(b'\n', &mut buf)
        .map_err(|e| McError::from_io(e, "read response line"))?;
    if n == 0 {
        return Err(McError::Protocol(
            "unexpected end of stream while reading response line".to_string(),
        ));
    }
    while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf)
        .map_err(|_| McError::Protocol("response line is not valid UTF-8".to_string()))
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a `get` response
///
/// `END` alone signals a cache miss. A hit is a `VALUE <key> <flags> <len>`
/// header, exactly `len` payload bytes, the payload terminator, and the
/// trailing end-marker line.
pub fn read_get_response<R: BufRead>(reader: &mut R) -> Result<Item> {
    let header = read_line(reader)?;
    if header == END_MARKER {
        return Err(McError::CacheMiss);
    }

    let mut parts = header.split_whitespace();
    if parts.next() != Some("VALUE") {
        return Err(McError::Protocol(format!(
            "expected VALUE header, got {:?}",
            header
        )));
    }
    let key = parts
        .next()
        .ok_or_else(|| McError::Protocol(format!("missing key in VALUE header {:?}", header)))?
        .to_string();
    let flags: u16 = parse_decimal(parts.next(), "flags", &header)?;
    let length: usize = parse_decimal(parts.next(), "byte length", &header)?;
    if parts.next().is_some() {
        return Err(McError::Protocol(format!(
            "trailing tokens in VALUE header {:?}",
            header
        )));
    }

    // Byte-exact sub-read: the value may contain \r\n
    let mut value = vec![0u8; length];
    reader
        .read_exact(&mut value)
        .map_err(|e| McError::from_io(e, "read value payload"))?;

    let mut terminator = [0u8; 2];
    reader
        .read_exact(&mut terminator)
        .map_err(|e| McError::from_io(e, "read value terminator"))?;
    if &terminator != b"\r\n" {
        return Err(McError::Protocol(
            "value payload not terminated by CRLF".to_string(),
        ));
    }

    let trailer = read_line(reader)?;
    if trailer != END_MARKER {
        return Err(McError::Protocol(format!(
            "expected end-marker after value, got {:?}",
            trailer
        )));
    }

    Ok(Item {
        key,
        flags,
        value: Bytes::from(value),
    })
}

/// Decode a `set` response: `STORED` is success, anything else is a failure
/// carrying the raw server line.
pub fn read_set_response<R: BufRead>(reader: &mut R) -> Result<()> {
    let line = read_line(reader)?;
    if line == STORED {
        Ok(())
    } else {
        Err(McError::SetFailed(line))
    }
}

/// Decode a `delete` response
pub fn read_delete_response<R: BufRead>(reader: &mut R) -> Result<()> {
    let line = read_line(reader)?;
    match line.as_str() {
        DELETED => Ok(()),
        NOT_FOUND => Err(McError::KeyNotFound),
        _ => Err(McError::DeleteFailed(line)),
    }
}

/// Decode a stats-family response: `STAT <name> <value>` lines until the
/// end-marker. An explicit `ERROR` line aborts the parse.
pub fn read_stats_response<R: BufRead>(reader: &mut R) -> Result<StatsMap> {
    let mut stats = StatsMap::new();
    loop {
        let line = read_line(reader)?;
        match line.as_str() {
            END_MARKER => return Ok(stats),
            ERROR_MARKER => {
                return Err(McError::Protocol("server returned ERROR".to_string()));
            }
            _ => {
                // Split on the first two spaces only; stat values may contain spaces
                let mut parts = line.splitn(3, ' ');
                let (tag, name, value) = (parts.next(), parts.next(), parts.next());
                if tag != Some("STAT") {
                    return Err(McError::Protocol(format!(
                        "expected STAT line, got {:?}",
                        line
                    )));
                }
                match (name, value) {
                    (Some(name), Some(value)) => {
                        stats.insert(name.to_string(), value.to_string());
                    }
                    _ => {
                        return Err(McError::Protocol(format!(
                            "malformed STAT line {:?}",
                            line
                        )));
                    }
                }
            }
        }
    }
}

/// Extract per-bucket item counts from a `stats items` map
///
/// Counts live under keys of the form `items:<bucket>:number`; other stat
/// keys are ignored.
pub fn item_bucket_counts(stats: &StatsMap) -> Result<HashMap<u32, u64>> {
    let mut counts = HashMap::new();
    for (name, value) in stats {
        let mut fields = name.split(':');
        if fields.next() != Some("items") {
            continue;
        }
        let (bucket, tail) = match (fields.next(), fields.next()) {
            (Some(bucket), Some("number")) => (bucket, fields.next()),
            _ => continue,
        };
        if tail.is_some() {
            continue;
        }
        let bucket: u32 = bucket.parse().map_err(|_| {
            McError::Protocol(format!("invalid bucket in stat key {:?}", name))
        })?;
        let count: u64 = value.parse().map_err(|_| {
            McError::Protocol(format!("invalid item count {:?} for {:?}", value, name))
        })?;
        counts.insert(bucket, count);
    }
    Ok(counts)
}

/// Decode one bucket's `stats cachedump` stream into `items`
///
/// Lines of the form `ITEM <key> [<size> b; <expire> s]` each yield one
/// [`ItemMeta`]; later entries overwrite earlier ones with the same key.
/// Other lines are skipped, matching the server's habit of interleaving
/// informational output. The end-marker terminates the stream.
pub fn read_item_dump<R: BufRead>(
    reader: &mut R,
    items: &mut HashMap<String, ItemMeta>,
) -> Result<()> {
    loop {
        let line = read_line(reader)?;
        match line.as_str() {
            END_MARKER => return Ok(()),
            ERROR_MARKER => {
                return Err(McError::Protocol("server returned ERROR".to_string()));
            }
            _ => {
                if let Some(meta) = parse_item_line(&line)? {
                    items.insert(meta.key.clone(), meta);
                }
            }
        }
    }
}

/// Parse an `ITEM <key> [<size> b; <expire> s]` line
///
/// Returns `Ok(None)` for lines that are not ITEM lines at all; an ITEM line
/// with a malformed bracket section is a hard error.
fn parse_item_line(line: &str) -> Result<Option<ItemMeta>> {
    let rest = match line.strip_prefix("ITEM ") {
        Some(rest) => rest,
        None => return Ok(None),
    };
    let malformed = || McError::Protocol(format!("malformed ITEM line {:?}", line));

    let (key, bracket) = rest.split_once(" [").ok_or_else(malformed)?;
    let body = bracket.strip_suffix(']').ok_or_else(malformed)?;
    let (size_part, expire_part) = body.split_once("; ").ok_or_else(malformed)?;
    let size = size_part.strip_suffix(" b").ok_or_else(malformed)?;
    let expire = expire_part.strip_suffix(" s").ok_or_else(malformed)?;

    let expire: i64 = expire.parse().map_err(|_| malformed())?;
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    Ok(Some(ItemMeta {
        key: key.to_string(),
        size: size.to_string(),
        expire,
    }))
}

/// Decode a `config get cluster` response
///
/// The second payload line is the topology version and the third is the
/// space-separated node list; every other payload line (the banner, any
/// blank padding before the end-marker) is ignored. Each node entry is
/// `host|ip|port`; the rendered host string takes the first and third
/// fields as `host:port`.
pub fn read_cluster_config<R: BufRead>(reader: &mut R) -> Result<ClusterConfig> {
    let mut version: Option<u64> = None;
    let mut hosts: Option<Vec<String>> = None;

    for idx in 0.. {
        let line = read_line(reader)?;
        match line.as_str() {
            END_MARKER => break,
            ERROR_MARKER => {
                return Err(McError::Protocol("server returned ERROR".to_string()));
            }
            _ => match idx {
                1 => {
                    version = Some(line.parse().map_err(|_| {
                        McError::Protocol(format!("invalid cluster version {:?}", line))
                    })?);
                }
                2 => {
                    let mut parsed = Vec::new();
                    for entry in line.split(' ').filter(|e| !e.is_empty()) {
                        let fields: Vec<&str> = entry.split('|').collect();
                        if fields.len() < 3 {
                            return Err(McError::Protocol(format!(
                                "malformed cluster node entry {:?}",
                                entry
                            )));
                        }
                        parsed.push(format!("{}:{}", fields[0], fields[2]));
                    }
                    hosts = Some(parsed);
                }
                // Index 0 is a banner line (e.g. "CONFIG cluster 0 147");
                // servers pad the payload with a blank line before the
                // end-marker. Only indices 1 and 2 carry data.
                _ => {}
            },
        }
    }

    match (version, hosts) {
        (Some(version), Some(hosts)) => Ok(ClusterConfig { version, hosts }),
        _ => Err(McError::Protocol(
            "truncated cluster config response".to_string(),
        )),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_decimal<T: std::str::FromStr>(
    token: Option<&str>,
    what: &str,
    header: &str,
) -> Result<T> {
    token
        .ok_or_else(|| McError::Protocol(format!("missing {} in header {:?}", what, header)))?
        .parse()
        .map_err(|_| McError::Protocol(format!("invalid {} in header {:?}", what, header)))
}
