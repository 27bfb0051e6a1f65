//! Sans-IO HTTP header-compression codec.
//!
//! An encoder and a decoder each own an [`EncodingContext`]: a header table
//! seeded with common headers, plus a reference set of entries that are
//! implicitly part of every header set until toggled off. Encoding a header
//! set mutates the encoder's context; decoding the resulting block mutates
//! the decoder's context the same way, so the two stay equal as long as
//! blocks are decoded in order.
//!
//! String literals are optionally Huffman-coded with canonical codebooks
//! derived from per-direction symbol frequencies.
//!
//! # Architecture
//!
//! ```text
//!   header list                               header list
//!        |                                          ^
//!   +----v----------+    header block    +----------+----+
//!   | HeaderEncoder | -----------------> | HeaderDecoder |
//!   +---------------+                    +---------------+
//!   | EncodingContext                    | EncodingContext
//!   |   HeaderTable + reference set      |   (mirror)
//!   +-- wire / opcode / huffman          +-- wire / opcode / huffman
//! ```
//!
//! # Example
//!
//! ```rust
//! use protocol_hpack::{DecoderConfig, EncoderConfig, HeaderDecoder, HeaderEncoder, HeaderField};
//!
//! let config = EncoderConfig::default();
//! let mut encoder = HeaderEncoder::new(config);
//! let mut decoder = HeaderDecoder::new(DecoderConfig::from(&config));
//!
//! let headers = vec![
//!     HeaderField::new(":method", "GET"),
//!     HeaderField::new(":scheme", "http"),
//!     HeaderField::new(":path", "/"),
//! ];
//! let block = encoder.encode_header_set(&headers)?;
//! assert_eq!(&block[..], &[0x84, 0x80, 0x83]);
//!
//! let decoded = decoder.decode(&block)?;
//! assert_eq!(decoded, headers);
//! assert_eq!(encoder.context(), decoder.context());
//! # Ok::<(), protocol_hpack::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod decoder;
pub mod encoder;
pub mod error;
mod freq;
pub mod header;
pub mod huffman;
pub mod metrics;
pub mod opcode;
pub mod static_table;
pub mod table;
pub mod wire;

pub use config::{CompressionLevel, DecoderConfig, EncoderConfig};
pub use context::EncodingContext;
pub use decoder::HeaderDecoder;
pub use encoder::HeaderEncoder;
pub use error::{Error, Result};
pub use header::{HeaderField, is_valid_header_name, is_valid_header_value};
pub use static_table::Direction;
pub use table::{HeaderEntry, HeaderTable, TableUpdate};
