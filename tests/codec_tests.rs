//! Codec Tests
//!
//! Tests for request encoding and response decoding.

use std::collections::HashMap;
use std::io::Cursor;

use bytes::Bytes;
use memctl::protocol::{
    encode_request, item_bucket_counts, read_cluster_config, read_delete_response,
    read_get_response, read_item_dump, read_set_response, read_stats_response, Request,
};
use memctl::McError;

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_get() {
    let bytes = encode_request(&Request::Get {
        key: "mykey".to_string(),
    });
    assert_eq!(bytes, b"get mykey\r\n");
}

#[test]
fn test_encode_set() {
    let bytes = encode_request(&Request::Set {
        key: "k".to_string(),
        flags: 7,
        expire: 30,
        value: Bytes::from_static(b"hello"),
    });
    assert_eq!(bytes, b"set k 7 30 5\r\nhello\r\n");
}

#[test]
fn test_encode_set_binary_value_with_crlf() {
    // Values may contain the line terminator; only the declared length frames them
    let bytes = encode_request(&Request::Set {
        key: "bin".to_string(),
        flags: 0,
        expire: 0,
        value: Bytes::from_static(b"a\r\nb"),
    });
    assert_eq!(bytes, b"set bin 0 0 4\r\na\r\nb\r\n");
}

#[test]
fn test_encode_delete() {
    let bytes = encode_request(&Request::Delete {
        key: "gone".to_string(),
    });
    assert_eq!(bytes, b"delete gone\r\n");
}

#[test]
fn test_encode_stats_variants() {
    assert_eq!(encode_request(&Request::stats(None)), b"stats\r\n");
    assert_eq!(
        encode_request(&Request::stats(Some("items"))),
        b"stats items\r\n"
    );
    assert_eq!(
        encode_request(&Request::CacheDump {
            bucket: 3,
            limit: 100
        }),
        b"stats cachedump 3 100\r\n"
    );
}

#[test]
fn test_encode_cluster_config() {
    assert_eq!(
        encode_request(&Request::ClusterConfig),
        b"config get cluster\r\n"
    );
}

// =============================================================================
// Get Response Tests
// =============================================================================

#[test]
fn test_decode_get_hit() {
    let mut cursor = Cursor::new(b"VALUE k 0 3\r\nabc\r\nEND\r\n".to_vec());
    let item = read_get_response(&mut cursor).unwrap();

    assert_eq!(item.key, "k");
    assert_eq!(item.flags, 0);
    assert_eq!(item.value, Bytes::from_static(b"abc"));
}

#[test]
fn test_decode_get_miss() {
    let mut cursor = Cursor::new(b"END\r\n".to_vec());
    let result = read_get_response(&mut cursor);
    assert!(matches!(result, Err(McError::CacheMiss)));
}

#[test]
fn test_decode_get_value_containing_crlf() {
    let mut cursor = Cursor::new(b"VALUE k 1 4\r\na\r\nb\r\nEND\r\n".to_vec());
    let item = read_get_response(&mut cursor).unwrap();

    assert_eq!(item.flags, 1);
    assert_eq!(item.value, Bytes::from_static(b"a\r\nb"));
}

#[test]
fn test_decode_get_malformed_header() {
    let mut cursor = Cursor::new(b"GARBAGE k 0 3\r\nabc\r\nEND\r\n".to_vec());
    let result = read_get_response(&mut cursor);
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_decode_get_bad_numerals() {
    for response in [
        "VALUE k x 3\r\nabc\r\nEND\r\n",  // flags not decimal
        "VALUE k 0 xx\r\nabc\r\nEND\r\n", // length not decimal
        "VALUE k 0\r\nabc\r\nEND\r\n",    // length missing
    ] {
        let mut cursor = Cursor::new(response.as_bytes().to_vec());
        let result = read_get_response(&mut cursor);
        assert!(
            matches!(result, Err(McError::Protocol(_))),
            "accepted {:?}",
            response
        );
    }
}

#[test]
fn test_decode_get_length_mismatch() {
    // Declared length runs past the payload terminator
    let mut cursor = Cursor::new(b"VALUE k 0 10\r\nabc\r\nEND\r\n".to_vec());
    let result = read_get_response(&mut cursor);
    assert!(result.is_err());
}

// =============================================================================
// Set / Delete Response Tests
// =============================================================================

#[test]
fn test_decode_set_stored() {
    let mut cursor = Cursor::new(b"STORED\r\n".to_vec());
    assert!(read_set_response(&mut cursor).is_ok());
}

#[test]
fn test_decode_set_not_stored() {
    let mut cursor = Cursor::new(b"NOT_STORED\r\n".to_vec());
    match read_set_response(&mut cursor) {
        Err(McError::SetFailed(line)) => assert_eq!(line, "NOT_STORED"),
        other => panic!("Expected SetFailed, got {:?}", other),
    }
}

#[test]
fn test_decode_delete_deleted() {
    let mut cursor = Cursor::new(b"DELETED\r\n".to_vec());
    assert!(read_delete_response(&mut cursor).is_ok());
}

#[test]
fn test_decode_delete_not_found() {
    let mut cursor = Cursor::new(b"NOT_FOUND\r\n".to_vec());
    let result = read_delete_response(&mut cursor);
    assert!(matches!(result, Err(McError::KeyNotFound)));
}

#[test]
fn test_decode_delete_unexpected_line() {
    let mut cursor = Cursor::new(b"SERVER_ERROR oom\r\n".to_vec());
    match read_delete_response(&mut cursor) {
        Err(McError::DeleteFailed(line)) => assert_eq!(line, "SERVER_ERROR oom"),
        other => panic!("Expected DeleteFailed, got {:?}", other),
    }
}

// =============================================================================
// Stats Response Tests
// =============================================================================

#[test]
fn test_decode_stats() {
    let response = b"STAT pid 1234\r\nSTAT version 1.6.21\r\nEND\r\n".to_vec();
    let stats = read_stats_response(&mut Cursor::new(response)).unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats["pid"], "1234");
    assert_eq!(stats["version"], "1.6.21");
}

#[test]
fn test_decode_stats_value_with_spaces() {
    // Only the first two spaces split the line
    let response = b"STAT note a b c\r\nEND\r\n".to_vec();
    let stats = read_stats_response(&mut Cursor::new(response)).unwrap();
    assert_eq!(stats["note"], "a b c");
}

#[test]
fn test_decode_stats_error_line_aborts() {
    let response = b"STAT pid 1234\r\nERROR\r\nEND\r\n".to_vec();
    let result = read_stats_response(&mut Cursor::new(response));
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_bucket_counts_from_stats_items() {
    let response =
        b"STAT items:3:number 2\r\nSTAT items:3:age 100\r\nSTAT items:5:number 0\r\nEND\r\n"
            .to_vec();
    let stats = read_stats_response(&mut Cursor::new(response)).unwrap();
    let counts = item_bucket_counts(&stats).unwrap();

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&3], 2);
    assert_eq!(counts[&5], 0);
}

// =============================================================================
// Item Dump Tests
// =============================================================================

#[test]
fn test_decode_item_dump() {
    let response = b"ITEM first [5 b; 0 s]\r\nITEM second [12 b; 1700000000 s]\r\nEND\r\n".to_vec();
    let mut items = HashMap::new();
    read_item_dump(&mut Cursor::new(response), &mut items).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items["first"].size, "5");
    assert_eq!(items["first"].expire, 0);
    assert_eq!(items["second"].size, "12");
    assert_eq!(items["second"].expire, 1_700_000_000);
}

#[test]
fn test_decode_item_dump_duplicate_key_last_wins() {
    let first = b"ITEM k [1 b; 0 s]\r\nEND\r\n".to_vec();
    let second = b"ITEM k [2 b; 9 s]\r\nEND\r\n".to_vec();

    let mut items = HashMap::new();
    read_item_dump(&mut Cursor::new(first), &mut items).unwrap();
    read_item_dump(&mut Cursor::new(second), &mut items).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items["k"].size, "2");
    assert_eq!(items["k"].expire, 9);
}

#[test]
fn test_decode_item_dump_malformed_item_line() {
    let response = b"ITEM broken [x b; y s]\r\nEND\r\n".to_vec();
    let mut items = HashMap::new();
    let result = read_item_dump(&mut Cursor::new(response), &mut items);
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_decode_item_dump_error_aborts() {
    let response = b"ERROR\r\n".to_vec();
    let mut items = HashMap::new();
    let result = read_item_dump(&mut Cursor::new(response), &mut items);
    assert!(matches!(result, Err(McError::Protocol(_))));
}

// =============================================================================
// Cluster Config Tests
// =============================================================================

#[test]
fn test_decode_cluster_config() {
    let response =
        b"CONFIG cluster 0 147\r\n1\r\n10.0.0.1|ip-1|11211 10.0.0.2|ip-2|11211\r\nEND\r\n"
            .to_vec();
    let config = read_cluster_config(&mut Cursor::new(response)).unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.hosts, vec!["10.0.0.1:11211", "10.0.0.2:11211"]);
}

#[test]
fn test_decode_cluster_config_single_node() {
    let response = b"CONFIG cluster 0 64\r\n12\r\ncache.local|10.1.2.3|11211\r\nEND\r\n".to_vec();
    let config = read_cluster_config(&mut Cursor::new(response)).unwrap();

    assert_eq!(config.version, 12);
    assert_eq!(config.hosts, vec!["cache.local:11211"]);
}

#[test]
fn test_decode_cluster_config_blank_line_before_end() {
    // Servers pad the payload with an empty line ahead of the end-marker
    let response = b"CONFIG cluster 0 147\r\n1\r\n10.0.0.1|ip-1|11211\r\n\r\nEND\r\n".to_vec();
    let config = read_cluster_config(&mut Cursor::new(response)).unwrap();

    assert_eq!(config.version, 1);
    assert_eq!(config.hosts, vec!["10.0.0.1:11211"]);
}

#[test]
fn test_decode_cluster_config_ignores_extra_payload_lines() {
    // Only the second and third payload lines carry data
    let response =
        b"CONFIG cluster 0 64\r\n3\r\nnode-a|10.0.0.1|11211\r\nunrecognized trailer\r\nEND\r\n"
            .to_vec();
    let config = read_cluster_config(&mut Cursor::new(response)).unwrap();

    assert_eq!(config.version, 3);
    assert_eq!(config.hosts, vec!["node-a:11211"]);
}

#[test]
fn test_decode_cluster_config_error_aborts() {
    let response = b"ERROR\r\n".to_vec();
    let result = read_cluster_config(&mut Cursor::new(response));
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_decode_cluster_config_bad_version() {
    let response = b"CONFIG cluster 0 1\r\nnotanumber\r\na|b|1\r\nEND\r\n".to_vec();
    let result = read_cluster_config(&mut Cursor::new(response));
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_decode_cluster_config_truncated() {
    let response = b"CONFIG cluster 0 1\r\nEND\r\n".to_vec();
    let result = read_cluster_config(&mut Cursor::new(response));
    assert!(matches!(result, Err(McError::Protocol(_))));
}

#[test]
fn test_decode_cluster_config_malformed_entry() {
    let response = b"CONFIG cluster 0 1\r\n3\r\nonly-one-field\r\nEND\r\n".to_vec();
    let result = read_cluster_config(&mut Cursor::new(response));
    assert!(matches!(result, Err(McError::Protocol(_))));
}
