//! Prefix integers and length-prefixed string literals.
//!
//! An integer with an N-bit prefix shares its first octet with the opcode
//! bits of the representation it belongs to:
//!
//! ```text
//!   0   1   2   3   4   5   6   7
//! +---+---+---+---+---+---+---+---+
//! | opcode    |   value (N bits)  |   value < 2^N - 1
//! +---+---+---+---+---+---+---+---+
//!
//! +---+---+---+---+---+---+---+---+
//! | opcode    | 1   1   1   1   1 |   value >= 2^N - 1
//! +---+---+---+---+---+---+---+---+
//! | 1 |  (value - 2^N + 1) low 7  |   continuation octets,
//! +---+---------------------------+   least significant first,
//! | 0 |  remaining high bits      |   high bit = more follow
//! +---+---------------------------+
//! ```
//!
//! With N = 0 there is no prefix octet at all; the value starts directly
//! with continuation octets.
//!
//! A string literal is an `H` flag bit followed by a 7-bit-prefix length and
//! that many octets, Huffman-coded when `H` is set.

use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::huffman::{Codebook, InverseCodebook};

/// Appends `value` as an integer with a `prefix_bits`-bit prefix (0..=8).
/// `opcode` fills the `8 - prefix_bits` high bits of the first octet.
pub fn encode_integer(dst: &mut BytesMut, opcode: u8, prefix_bits: u8, value: u64) {
    debug_assert!(prefix_bits <= 8);
    let marker = (1u64 << prefix_bits) - 1;
    let head = (u16::from(opcode) << prefix_bits) as u8;

    if value < marker {
        dst.put_u8(head | value as u8);
        return;
    }
    if prefix_bits > 0 {
        dst.put_u8(head | marker as u8);
    }

    let mut remaining = value - marker;
    while remaining >= 128 {
        dst.put_u8(0x80 | (remaining & 0x7f) as u8);
        remaining >>= 7;
    }
    dst.put_u8(remaining as u8);
}

/// Decodes an integer with a `prefix_bits`-bit prefix from the start of
/// `buf`, returning the value and the number of octets consumed.
pub fn decode_integer(buf: &[u8], prefix_bits: u8) -> Result<(u64, usize)> {
    let mut reader = Reader::new(buf);
    let value = reader.integer(prefix_bits)?;
    Ok((value, reader.position()))
}

/// Appends a string literal, Huffman-coded if `codebook` is given and the
/// coded form is strictly shorter. Returns whether Huffman coding was used.
pub fn encode_string(dst: &mut BytesMut, data: &[u8], codebook: Option<&Codebook>) -> bool {
    if let Some(codebook) = codebook {
        let coded_len = codebook.encoded_len(data);
        if coded_len < data.len() {
            encode_integer(dst, 1, 7, coded_len as u64);
            codebook.encode(data, dst);
            return true;
        }
    }
    encode_integer(dst, 0, 7, data.len() as u64);
    dst.extend_from_slice(data);
    false
}

/// Cursor over an encoded header block.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek_octet(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(Error::UnexpectedEndOfBuffer)
    }

    fn next_octet(&mut self) -> Result<u8> {
        let octet = self.peek_octet()?;
        self.pos += 1;
        Ok(octet)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        let data = &self.buf[self.pos..end];
        self.pos = end;
        Ok(data)
    }

    pub(crate) fn integer(&mut self, prefix_bits: u8) -> Result<u64> {
        let mut value = 0u64;
        let mut more = true;

        if prefix_bits > 0 {
            let marker = (1u64 << prefix_bits) - 1;
            value = u64::from(self.next_octet()?) & marker;
            more = value == marker;
        }

        let mut shift = 0u32;
        while more {
            let octet = self.next_octet()?;
            more = octet & 0x80 != 0;
            let chunk = u64::from(octet & 0x7f);
            if shift >= 64 || (chunk << shift) >> shift != chunk {
                return Err(Error::IntegerOverflow);
            }
            value = value
                .checked_add(chunk << shift)
                .ok_or(Error::IntegerOverflow)?;
            shift += 7;
        }
        Ok(value)
    }

    pub(crate) fn index(&mut self, prefix_bits: u8) -> Result<usize> {
        let value = self.integer(prefix_bits)?;
        usize::try_from(value).map_err(|_| Error::IntegerOverflow)
    }

    /// Reads a string literal, Huffman-decoding it with `inverse` if the
    /// `H` bit is set.
    pub(crate) fn string(&mut self, inverse: &InverseCodebook) -> Result<Vec<u8>> {
        let huffman = self.peek_octet()? & 0x80 != 0;
        let len = self.index(7)?;
        let data = self.take(len)?;
        if huffman {
            inverse.decode(data)
        } else {
            Ok(data.to_vec())
        }
    }
}
