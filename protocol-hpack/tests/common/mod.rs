//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use proptest::test_runner::Config as ProptestConfig;
use protocol_hpack::HeaderField;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging at trace level. Only the first call has an effect.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig::with_cases(cases)
}

pub fn fields(pairs: &[(&str, &str)]) -> Vec<HeaderField> {
    pairs
        .iter()
        .map(|&(name, value)| HeaderField::new(name, value))
        .collect()
}

/// Sorts a header list so two lists compare as multisets.
pub fn sorted(mut headers: Vec<HeaderField>) -> Vec<HeaderField> {
    headers.sort_by(|a, b| (&a.name, &a.value).cmp(&(&b.name, &b.value)));
    headers
}

// -- Fixtures --

pub fn example_requests() -> Vec<Vec<HeaderField>> {
    vec![
        fields(&[
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.foo.com"),
        ]),
        fields(&[
            (":method", "GET"),
            (":scheme", "https"),
            (":path", "/"),
            (":authority", "www.bar.com"),
            ("cache-control", "no-cache"),
        ]),
        fields(&[
            (":method", "GET"),
            (":scheme", "https"),
            (":path", "/custom-path.css"),
            (":authority", "www.bar.com"),
            ("custom-key", "custom-value"),
        ]),
    ]
}

const COOKIE_BLOCK: &str = "LASDJKHQKBZXOQWEOPIUAXQWEOIUAXLJKHQWOEIUALQWEOIUAXLQEUAXLLKJASDQWEOUIAXN1234";

fn long_cookie(head: char, tail: char) -> String {
    let mut cookie = String::from("foo=");
    cookie.extend(std::iter::repeat_n(head, 72));
    for _ in 0..4 {
        cookie.push_str(COOKIE_BLOCK);
    }
    cookie.extend(std::iter::repeat_n(tail, 72));
    cookie.push_str("1234 max-age=3600; version=1");
    cookie
}

pub fn example_responses() -> Vec<Vec<HeaderField>> {
    let mut second = fields(&[
        (":status", "200"),
        ("cache-control", "private"),
        ("date", "Mon, 21 OCt 2013 20:13:22 GMT"),
        ("location", "https://www.bar.com"),
        ("content-encoding", "gzip"),
    ]);
    let mut third = second.clone();
    second.push(HeaderField::new("set-cookie", long_cookie('A', 'Z')));
    third.push(HeaderField::new("set-cookie", long_cookie('Z', 'A')));

    vec![
        fields(&[
            (":status", "302"),
            ("cache-control", "private"),
            ("date", "Mon, 21 OCt 2013 20:13:21 GMT"),
            ("location", "https://www.bar.com"),
        ]),
        second,
        third,
    ]
}
