//! Codec benchmarks.
//!
//! - Header set encoding and decoding against a warm context
//! - Huffman coding of typical header values

use bytes::{Bytes, BytesMut};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use protocol_hpack::huffman::{codebook, inverse_codebook};
use protocol_hpack::{
    CompressionLevel, DecoderConfig, Direction, EncoderConfig, HeaderDecoder, HeaderEncoder,
    HeaderField,
};

fn request_headers() -> Vec<HeaderField> {
    vec![
        HeaderField::new(":method", "GET"),
        HeaderField::new(":scheme", "https"),
        HeaderField::new(":path", "/api/v1/users"),
        HeaderField::new(":authority", "example.com"),
        HeaderField::new("user-agent", "bench/1.0"),
        HeaderField::new("accept", "application/json"),
        HeaderField::new("accept-encoding", "gzip, deflate"),
    ]
}

fn response_headers() -> Vec<HeaderField> {
    vec![
        HeaderField::new(":status", "200"),
        HeaderField::new("content-type", "application/json"),
        HeaderField::new("content-length", "1234"),
        HeaderField::new("cache-control", "private"),
        HeaderField::new("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("hpack/encode");

    for level in [CompressionLevel::NONE, CompressionLevel::INCREMENTAL] {
        group.bench_function(format!("request_cold/level{}", level.get()), |b| {
            let headers = request_headers();
            let config = EncoderConfig::default().compression_level(level);
            b.iter_batched(
                || (HeaderEncoder::new(config), BytesMut::with_capacity(256)),
                |(mut encoder, mut buf)| {
                    encoder.encode(&headers, &mut buf).unwrap();
                    black_box(buf.len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    // Alternating sets exercise the reference set and substitution.
    group.bench_function("request_warm", |b| {
        let first = request_headers();
        let mut second = request_headers();
        second[2] = HeaderField::new(":path", "/api/v1/orders");
        let mut encoder = HeaderEncoder::default();
        let mut buf = BytesMut::with_capacity(256);
        let mut flip = false;
        b.iter(|| {
            buf.clear();
            flip = !flip;
            let set = if flip { &first } else { &second };
            encoder.encode(set, &mut buf).unwrap();
            black_box(buf.len())
        })
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("hpack/decode");

    for (name, direction, headers) in [
        ("request", Direction::Request, request_headers()),
        ("response", Direction::Response, response_headers()),
    ] {
        let config = EncoderConfig::default().direction(direction);
        let block: Bytes = HeaderEncoder::new(config)
            .encode_header_set(&headers)
            .unwrap();
        group.throughput(Throughput::Bytes(block.len() as u64));
        group.bench_function(name, |b| {
            b.iter_batched(
                || HeaderDecoder::new(DecoderConfig::from(&config)),
                |mut decoder| {
                    let mut count = 0usize;
                    decoder
                        .decode_header_set(black_box(&block), |_, _| count += 1)
                        .unwrap();
                    black_box(count)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("hpack/huffman");
    let value = b"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";
    let book = codebook(Direction::Request);
    let mut encoded = BytesMut::new();
    book.encode(value, &mut encoded);

    group.throughput(Throughput::Bytes(value.len() as u64));
    group.bench_function("encode", |b| {
        let mut buf = BytesMut::with_capacity(64);
        b.iter(|| {
            buf.clear();
            book.encode(black_box(value), &mut buf);
            black_box(buf.len())
        })
    });
    group.bench_function("decode", |b| {
        let inverse = inverse_codebook(Direction::Request);
        b.iter(|| black_box(inverse.decode(black_box(&encoded)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_huffman);
criterion_main!(benches);
