//! Codec metrics.
//!
//! Process-wide counters shared by every encoder and decoder. Exposed through
//! metriken's registry so an embedding server can publish them alongside its
//! own metrics.

use metriken::{Counter, metric};

// ── Header sets ──────────────────────────────────────────────────

#[metric(
    name = "hpack/header_sets/encoded",
    description = "Header sets encoded"
)]
pub static HEADER_SETS_ENCODED: Counter = Counter::new();

#[metric(
    name = "hpack/header_sets/decoded",
    description = "Header sets decoded"
)]
pub static HEADER_SETS_DECODED: Counter = Counter::new();

// ── Bytes ────────────────────────────────────────────────────────

#[metric(name = "hpack/bytes/encoded", description = "Header block bytes produced")]
pub static BYTES_ENCODED: Counter = Counter::new();

#[metric(name = "hpack/bytes/decoded", description = "Header block bytes consumed")]
pub static BYTES_DECODED: Counter = Counter::new();

// ── Table ────────────────────────────────────────────────────────

#[metric(
    name = "hpack/table/evictions",
    description = "Header table entries evicted"
)]
pub static TABLE_EVICTIONS: Counter = Counter::new();

// ── Errors ───────────────────────────────────────────────────────

#[metric(name = "hpack/decode/errors", description = "Failed header set decodes")]
pub static DECODE_ERRORS: Counter = Counter::new();

// ── Huffman ──────────────────────────────────────────────────────

#[metric(
    name = "hpack/huffman/strings",
    description = "String literals emitted Huffman-coded"
)]
pub static HUFFMAN_STRINGS: Counter = Counter::new();
