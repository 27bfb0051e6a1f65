//! Header representations and their wire layout.
//!
//! ```text
//! indexed                 1xxxxxxx   index (7-bit prefix)
//! literal, no indexing    011xxxxx   name (5-bit prefix), value
//! literal, incremental    010xxxxx   name (5-bit prefix), value
//! literal, substitution   00xxxxxx   name (6-bit prefix), substituted index
//!                                    (no prefix), value
//! ```
//!
//! A name field holds the index of an entry whose name is reused, plus one,
//! or 0 followed by the name as a string literal.

use std::borrow::Cow;

use bytes::BytesMut;

use crate::error::{Error, Result};
use crate::huffman::{Codebook, InverseCodebook};
use crate::metrics::HUFFMAN_STRINGS;
use crate::wire::{Reader, encode_integer, encode_string};

const INDEXED: u8 = 0b1;
const LITERAL_NO_INDEX: u8 = 0b011;
const LITERAL_INCREMENTAL: u8 = 0b010;
const LITERAL_SUBSTITUTION: u8 = 0b00;

const INDEXED_PREFIX: u8 = 7;
const LITERAL_PREFIX: u8 = 5;
const SUBSTITUTION_PREFIX: u8 = 6;
const SUBSTITUTED_INDEX_PREFIX: u8 = 0;

/// The name of a literal header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name<'a> {
    /// Reuse the name of the entry at this index.
    Index(usize),
    /// Name sent as a string literal.
    Literal(Cow<'a, [u8]>),
}

/// One header representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation<'a> {
    /// Toggles the entry at `index` in the reference set.
    Indexed { index: usize },
    /// Literal appended to the header table.
    LiteralIncremental { name: Name<'a>, value: Cow<'a, [u8]> },
    /// Literal replacing the entry at `substituted`.
    LiteralSubstitution {
        name: Name<'a>,
        substituted: usize,
        value: Cow<'a, [u8]>,
    },
    /// Literal that leaves the header table untouched.
    LiteralNoIndex { name: Name<'a>, value: Cow<'a, [u8]> },
}

impl<'a> Representation<'a> {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Representation::Indexed { .. } => "indexed",
            Representation::LiteralIncremental { .. } => "literal-incremental",
            Representation::LiteralSubstitution { .. } => "literal-substitution",
            Representation::LiteralNoIndex { .. } => "literal-no-index",
        }
    }

    /// Appends the wire form to `dst`. String literals are Huffman-coded
    /// with `codebook` when that is shorter.
    pub fn encode(&self, dst: &mut BytesMut, codebook: Option<&Codebook>) {
        match self {
            Representation::Indexed { index } => {
                encode_integer(dst, INDEXED, INDEXED_PREFIX, *index as u64);
            }
            Representation::LiteralIncremental { name, value } => {
                encode_name(dst, LITERAL_INCREMENTAL, LITERAL_PREFIX, name, codebook);
                encode_literal(dst, value, codebook);
            }
            Representation::LiteralSubstitution {
                name,
                substituted,
                value,
            } => {
                encode_name(
                    dst,
                    LITERAL_SUBSTITUTION,
                    SUBSTITUTION_PREFIX,
                    name,
                    codebook,
                );
                encode_integer(dst, 0, SUBSTITUTED_INDEX_PREFIX, *substituted as u64);
                encode_literal(dst, value, codebook);
            }
            Representation::LiteralNoIndex { name, value } => {
                encode_name(dst, LITERAL_NO_INDEX, LITERAL_PREFIX, name, codebook);
                encode_literal(dst, value, codebook);
            }
        }
    }
}

impl Representation<'static> {
    /// Reads the next representation. String literals with the `H` bit set
    /// are decoded with `inverse`.
    pub(crate) fn decode(reader: &mut Reader<'_>, inverse: &InverseCodebook) -> Result<Self> {
        let octet = reader.peek_octet()?;
        match octet >> 5 {
            0b100..=0b111 => Ok(Representation::Indexed {
                index: reader.index(INDEXED_PREFIX)?,
            }),
            0b011 => {
                let name = decode_name(reader, LITERAL_PREFIX, inverse)?;
                let value = Cow::Owned(reader.string(inverse)?);
                Ok(Representation::LiteralNoIndex { name, value })
            }
            0b010 => {
                let name = decode_name(reader, LITERAL_PREFIX, inverse)?;
                let value = Cow::Owned(reader.string(inverse)?);
                Ok(Representation::LiteralIncremental { name, value })
            }
            0b000 | 0b001 => {
                let name = decode_name(reader, SUBSTITUTION_PREFIX, inverse)?;
                let substituted = reader.index(SUBSTITUTED_INDEX_PREFIX)?;
                let value = Cow::Owned(reader.string(inverse)?);
                Ok(Representation::LiteralSubstitution {
                    name,
                    substituted,
                    value,
                })
            }
            // The arms above cover every 3-bit pattern.
            _ => Err(Error::InvalidOpcode(octet)),
        }
    }
}

fn encode_literal(dst: &mut BytesMut, data: &[u8], codebook: Option<&Codebook>) {
    if encode_string(dst, data, codebook) {
        HUFFMAN_STRINGS.increment();
    }
}

fn encode_name(
    dst: &mut BytesMut,
    opcode: u8,
    prefix_bits: u8,
    name: &Name<'_>,
    codebook: Option<&Codebook>,
) {
    match name {
        Name::Index(index) => encode_integer(dst, opcode, prefix_bits, *index as u64 + 1),
        Name::Literal(name) => {
            encode_integer(dst, opcode, prefix_bits, 0);
            encode_literal(dst, name, codebook);
        }
    }
}

fn decode_name(
    reader: &mut Reader<'_>,
    prefix_bits: u8,
    inverse: &InverseCodebook,
) -> Result<Name<'static>> {
    match reader.index(prefix_bits)? {
        0 => Ok(Name::Literal(Cow::Owned(reader.string(inverse)?))),
        n => Ok(Name::Index(n - 1)),
    }
}
