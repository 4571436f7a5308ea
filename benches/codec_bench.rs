//! Benchmarks for request encoding and key hashing

use std::io::Cursor;

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use memctl::locator::{hash_key, HashAlgorithm};
use memctl::protocol::{encode_request, read_get_response, Request};

fn codec_benchmarks(c: &mut Criterion) {
    let set = Request::Set {
        key: "benchmark-key".to_string(),
        flags: 0,
        expire: 0,
        value: Bytes::from(vec![0x42u8; 1024]),
    };
    c.bench_function("encode_set_1k", |b| {
        b.iter(|| encode_request(black_box(&set)))
    });

    let mut response = b"VALUE benchmark-key 0 1024\r\n".to_vec();
    response.extend_from_slice(&[0x42u8; 1024]);
    response.extend_from_slice(b"\r\nEND\r\n");
    c.bench_function("decode_get_1k", |b| {
        b.iter(|| read_get_response(&mut Cursor::new(black_box(&response))).unwrap())
    });
}

fn hash_benchmarks(c: &mut Criterion) {
    let key = "user:session:2f1a9c8e";
    c.bench_function("hash_native", |b| {
        b.iter(|| hash_key(black_box(key), HashAlgorithm::Native))
    });
    c.bench_function("hash_crc32", |b| {
        b.iter(|| hash_key(black_box(key), HashAlgorithm::Crc32))
    });
}

criterion_group!(benches, codec_benchmarks, hash_benchmarks);
criterion_main!(benches);
