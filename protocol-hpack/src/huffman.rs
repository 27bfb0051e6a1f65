//! Canonical Huffman coding for header string literals.
//!
//! Codebooks are derived from a 257-symbol frequency table (every octet value
//! plus an end-of-string symbol) rather than shipped as a fixed code table:
//!
//! 1. [`code_lengths`] builds an optimal prefix code with the two-queue
//!    construction and returns the depth of every leaf.
//! 2. [`canonicalize`] assigns canonical codes ordered by
//!    `(length, symbol)`.
//! 3. [`Codebook`] encodes, [`InverseCodebook`] decodes.
//!
//! The two process-wide codebooks (one per [`Direction`]) are built lazily
//! on first use and are read-only afterwards.

use std::collections::VecDeque;
use std::sync::OnceLock;

use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::freq::{REQUEST_FREQUENCIES, RESPONSE_FREQUENCIES};
use crate::static_table::Direction;

/// Number of symbols: 256 octet values plus end-of-string.
pub const SYMBOL_COUNT: usize = 257;

/// The end-of-string symbol.
pub const EOS: usize = 256;

/// Longest code the bit accumulators accept.
pub const MAX_CODE_LEN: u8 = 32;

// Non-zero weights are scaled up so that a zero weight (mapped to 1) stays
// strictly lighter than any observed symbol.
const WEIGHT_SHIFT: u32 = 16;

/// A single codeword, right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Code {
    pub bits: u32,
    pub len: u8,
}

// -- Code length construction --

struct Node {
    weight: u64,
    children: Option<(usize, usize)>,
}

/// Computes optimal code lengths for `frequencies`.
///
/// Zero-frequency symbols still receive a code. If the optimal tree is deeper
/// than [`MAX_CODE_LEN`], the weights are flattened by a growing divisor and
/// the tree is rebuilt until it fits.
pub fn code_lengths(frequencies: &[u32]) -> Vec<u8> {
    match frequencies.len() {
        0 => return Vec::new(),
        1 => return vec![1],
        _ => {}
    }

    let mut divisor = 1u64;
    loop {
        let weights: Vec<u64> = frequencies
            .iter()
            .map(|&f| scaled_weight(f, divisor))
            .collect();
        let depths = tree_depths(&weights);
        if depths.iter().all(|&d| d <= usize::from(MAX_CODE_LEN)) {
            return depths.into_iter().map(|d| d as u8).collect();
        }
        divisor <<= 1;
    }
}

fn scaled_weight(frequency: u32, divisor: u64) -> u64 {
    if frequency == 0 {
        1
    } else {
        ((u64::from(frequency) << WEIGHT_SHIFT) / divisor).max(2)
    }
}

/// Leaf depths of the Huffman tree over `weights` (at least two symbols).
fn tree_depths(weights: &[u64]) -> Vec<usize> {
    let mut nodes: Vec<Node> = weights
        .iter()
        .map(|&weight| Node {
            weight,
            children: None,
        })
        .collect();

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by_key(|&i| (weights[i], i));
    let mut leaves: VecDeque<usize> = order.into();
    let mut merged: VecDeque<usize> = VecDeque::new();

    while leaves.len() + merged.len() > 1 {
        let (Some(a), Some(b)) = (
            pop_lightest(&nodes, &mut leaves, &mut merged),
            pop_lightest(&nodes, &mut leaves, &mut merged),
        ) else {
            break;
        };
        nodes.push(Node {
            weight: nodes[a].weight + nodes[b].weight,
            children: Some((a, b)),
        });
        merged.push_back(nodes.len() - 1);
    }

    let mut depths = vec![0; weights.len()];
    let Some(root) = merged.pop_front().or_else(|| leaves.pop_front()) else {
        return depths;
    };
    let mut stack = vec![(root, 0usize)];
    while let Some((index, depth)) = stack.pop() {
        match nodes[index].children {
            Some((left, right)) => {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
            None => depths[index] = depth,
        }
    }
    depths
}

// Leaves win ties against merged nodes.
fn pop_lightest(
    nodes: &[Node],
    leaves: &mut VecDeque<usize>,
    merged: &mut VecDeque<usize>,
) -> Option<usize> {
    match (leaves.front(), merged.front()) {
        (Some(&l), Some(&m)) if nodes[m].weight < nodes[l].weight => merged.pop_front(),
        (Some(_), _) => leaves.pop_front(),
        (None, _) => merged.pop_front(),
    }
}

/// Assigns canonical codes to a code length table.
///
/// Symbols are ordered by `(length, symbol)`; the first receives code 0 and
/// each later one `(previous + 1) << (length - previous_length)`. Symbols of
/// length 0 get no code.
pub fn canonicalize(lengths: &[u8]) -> Vec<Code> {
    let mut order: Vec<usize> = (0..lengths.len()).filter(|&s| lengths[s] > 0).collect();
    order.sort_by_key(|&s| (lengths[s], s));

    let mut codes = vec![Code::default(); lengths.len()];
    let mut code = 0u64;
    let mut prev_len = 0u8;
    for (i, &sym) in order.iter().enumerate() {
        let len = lengths[sym];
        if i > 0 {
            code = (code + 1) << (len - prev_len);
        }
        codes[sym] = Code {
            bits: code as u32,
            len,
        };
        prev_len = len;
    }
    codes
}

// -- Codebook --

/// Symbol to code map for one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    codes: Vec<Code>,
}

impl Codebook {
    /// Builds the canonical codebook for a frequency table.
    pub fn from_frequencies(frequencies: &[u32; SYMBOL_COUNT]) -> Self {
        let lengths = code_lengths(frequencies);
        Self {
            codes: canonicalize(&lengths),
        }
    }

    /// Builds a codebook from explicit code lengths.
    ///
    /// Every length must lie in `1..=MAX_CODE_LEN` and the lengths must
    /// describe a prefix code (Kraft sum at most 1), otherwise
    /// [`Error::InvalidCode`] is returned.
    pub fn from_code_lengths(lengths: &[u8; SYMBOL_COUNT]) -> Result<Self> {
        if lengths.iter().any(|&l| !(1..=MAX_CODE_LEN).contains(&l)) {
            return Err(Error::InvalidCode);
        }
        // Sum of 2^(MAX_CODE_LEN - len) must not exceed 2^MAX_CODE_LEN.
        let kraft: u64 = lengths
            .iter()
            .map(|&l| 1u64 << (MAX_CODE_LEN - l))
            .sum();
        if kraft > 1u64 << MAX_CODE_LEN {
            return Err(Error::InvalidCode);
        }
        Ok(Self {
            codes: canonicalize(lengths),
        })
    }

    /// The code for `symbol`, or `None` past the end-of-string symbol.
    pub fn code(&self, symbol: usize) -> Option<Code> {
        self.codes.get(symbol).copied()
    }

    /// The end-of-string code.
    pub fn eos(&self) -> Code {
        self.codes[EOS]
    }

    /// Number of octets [`encode`](Self::encode) produces for `data`.
    pub fn encoded_len(&self, data: &[u8]) -> usize {
        let bits: usize = data
            .iter()
            .map(|&b| usize::from(self.codes[usize::from(b)].len))
            .sum();
        bits.div_ceil(8)
    }

    /// Huffman-encodes `data` and appends it to `dst`.
    ///
    /// The final partial octet is filled with the leading bits of the
    /// end-of-string code (repeated if the code is shorter than the gap).
    pub fn encode(&self, data: &[u8], dst: &mut BytesMut) {
        let mut bits: u64 = 0;
        let mut bit_count = 0u32;

        for &byte in data {
            let code = self.codes[usize::from(byte)];
            bits = (bits << code.len) | u64::from(code.bits);
            bit_count += u32::from(code.len);

            while bit_count >= 8 {
                bit_count -= 8;
                dst.put_u8((bits >> bit_count) as u8);
            }
        }

        if bit_count > 0 {
            let eos = self.eos();
            let eos_len = u32::from(eos.len);
            let mut need = 8 - bit_count;
            while need > 0 && eos_len > 0 {
                let take = need.min(eos_len);
                let prefix = eos.bits >> (eos_len - take);
                bits = (bits << take) | u64::from(prefix);
                need -= take;
            }
            bits <<= need;
            dst.put_u8(bits as u8);
        }
    }

    /// Builds the decoding table for this codebook.
    pub fn inverse(&self) -> InverseCodebook {
        InverseCodebook::new(self)
    }
}

// -- Inverse codebook --

/// Code to symbol map.
///
/// Canonical codes of one length are consecutive integers, so each length
/// only needs its first code, how many codes it has, and where its symbols
/// start in the sorted symbol list.
#[derive(Debug, Clone)]
pub struct InverseCodebook {
    first_code: [u32; MAX_CODE_LEN as usize + 1],
    count: [u32; MAX_CODE_LEN as usize + 1],
    offset: [usize; MAX_CODE_LEN as usize + 1],
    symbols: Vec<u16>,
    max_len: u8,
    eos: Code,
}

impl InverseCodebook {
    fn new(codebook: &Codebook) -> Self {
        let mut sorted: Vec<(u8, u32, u16)> = codebook
            .codes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.len > 0)
            .map(|(sym, c)| (c.len, c.bits, sym as u16))
            .collect();
        sorted.sort_unstable();

        let mut inverse = Self {
            first_code: [0; MAX_CODE_LEN as usize + 1],
            count: [0; MAX_CODE_LEN as usize + 1],
            offset: [0; MAX_CODE_LEN as usize + 1],
            symbols: Vec::with_capacity(sorted.len()),
            max_len: 0,
            eos: codebook.eos(),
        };
        for (i, &(len, bits, sym)) in sorted.iter().enumerate() {
            let l = usize::from(len);
            if inverse.count[l] == 0 {
                inverse.first_code[l] = bits;
                inverse.offset[l] = i;
            }
            inverse.count[l] += 1;
            inverse.symbols.push(sym);
            inverse.max_len = inverse.max_len.max(len);
        }
        inverse
    }

    fn lookup(&self, code: u32, len: u8) -> Option<usize> {
        let l = usize::from(len);
        let first = self.first_code[l];
        if self.count[l] > 0 && code >= first && code - first < self.count[l] {
            Some(usize::from(self.symbols[self.offset[l] + (code - first) as usize]))
        } else {
            None
        }
    }

    /// Decodes a Huffman-coded octet string.
    ///
    /// Decoding stops at the end-of-string symbol, which may only appear in
    /// the final octet. Trailing bits that do not complete a code must be a
    /// strict prefix of the end-of-string code.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 8 / 5);
        let mut code = 0u32;
        let mut len = 0u8;

        for (i, &byte) in data.iter().enumerate() {
            for shift in (0..8).rev() {
                code = (code << 1) | u32::from((byte >> shift) & 1);
                len += 1;

                match self.lookup(code, len) {
                    Some(EOS) if i + 1 == data.len() => return Ok(out),
                    Some(EOS) => return Err(Error::InvalidCode),
                    Some(sym) => {
                        out.push(sym as u8);
                        code = 0;
                        len = 0;
                    }
                    None if len >= self.max_len => return Err(Error::InvalidCode),
                    None => {}
                }
            }
        }

        if len > 0 {
            let eos_len = self.eos.len;
            if len >= 8 || len >= eos_len || code != self.eos.bits >> (eos_len - len) {
                return Err(Error::InvalidCode);
            }
        }
        Ok(out)
    }
}

// -- Process-wide codebooks --

/// The codebook used to encode strings travelling in `direction`.
pub fn codebook(direction: Direction) -> &'static Codebook {
    static REQUEST: OnceLock<Codebook> = OnceLock::new();
    static RESPONSE: OnceLock<Codebook> = OnceLock::new();
    match direction {
        Direction::Request => {
            REQUEST.get_or_init(|| Codebook::from_frequencies(&REQUEST_FREQUENCIES))
        }
        Direction::Response => {
            RESPONSE.get_or_init(|| Codebook::from_frequencies(&RESPONSE_FREQUENCIES))
        }
    }
}

/// The decoding table for strings travelling in `direction`.
pub fn inverse_codebook(direction: Direction) -> &'static InverseCodebook {
    static REQUEST: OnceLock<InverseCodebook> = OnceLock::new();
    static RESPONSE: OnceLock<InverseCodebook> = OnceLock::new();
    let cell = match direction {
        Direction::Request => &REQUEST,
        Direction::Response => &RESPONSE,
    };
    cell.get_or_init(|| codebook(direction).inverse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_vec(codebook: &Codebook, data: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        codebook.encode(data, &mut buf);
        buf.to_vec()
    }

    fn kraft_sum(lengths: &[u8]) -> f64 {
        lengths.iter().map(|&l| 0.5f64.powi(i32::from(l))).sum()
    }

    #[test]
    fn lengths_for_simple_weights() {
        // a:1 b:1 c:2 d:4 -> d=1 c=2 a=3 b=3
        assert_eq!(code_lengths(&[1, 1, 2, 4]), vec![3, 3, 2, 1]);
    }

    #[test]
    fn lengths_for_degenerate_inputs() {
        assert!(code_lengths(&[]).is_empty());
        assert_eq!(code_lengths(&[7]), vec![1]);
        assert_eq!(code_lengths(&[0, 0]), vec![1, 1]);
    }

    #[test]
    fn zero_weights_get_longest_codes() {
        let lengths = code_lengths(&[0, 10, 10, 0]);
        assert!(lengths[0] >= lengths[1]);
        assert!(lengths[3] >= lengths[2]);
        assert!(lengths.iter().all(|&l| l > 0));
    }

    #[test]
    fn lengths_are_bounded() {
        // Fibonacci weights force a maximally skewed tree.
        let mut fib = vec![1u32, 1];
        while fib.len() < 45 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let lengths = code_lengths(&fib);
        assert!(lengths.iter().all(|&l| l <= MAX_CODE_LEN));
        assert!(kraft_sum(&lengths) <= 1.0);
    }

    #[test]
    fn canonical_codes() {
        let codes = canonicalize(&[3, 3, 2, 1]);
        assert_eq!(codes[3], Code { bits: 0b0, len: 1 });
        assert_eq!(codes[2], Code { bits: 0b10, len: 2 });
        assert_eq!(codes[0], Code { bits: 0b110, len: 3 });
        assert_eq!(codes[1], Code { bits: 0b111, len: 3 });
    }

    #[test]
    fn canonical_codes_are_deterministic_and_ordered() {
        let lengths = code_lengths(&REQUEST_FREQUENCIES);
        let a = canonicalize(&lengths);
        let b = canonicalize(&lengths);
        assert_eq!(a, b);

        for len in 1..=MAX_CODE_LEN {
            let same: Vec<(usize, u32)> = a
                .iter()
                .enumerate()
                .filter(|(_, c)| c.len == len)
                .map(|(s, c)| (s, c.bits))
                .collect();
            assert!(same.windows(2).all(|w| w[0].1 < w[1].1));
        }
    }

    #[test]
    fn static_codebooks_are_complete_prefix_codes() {
        for direction in [Direction::Request, Direction::Response] {
            let book = codebook(direction);
            let lengths: Vec<u8> = (0..SYMBOL_COUNT).map(|s| book.codes[s].len).collect();
            assert!(lengths.iter().all(|&l| (1..=MAX_CODE_LEN).contains(&l)));
            assert!((kraft_sum(&lengths) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn frequent_symbols_are_shorter() {
        let book = codebook(Direction::Request);
        // '/' is common in request headers, NUL never appears.
        let len = |symbol: u8| book.code(usize::from(symbol)).unwrap().len;
        assert!(len(b'/') < len(0));
        assert!(len(b'e') <= 6);
    }

    #[test]
    fn code_lookup_is_bounded() {
        let book = codebook(Direction::Response);
        assert_eq!(book.code(EOS), Some(book.eos()));
        assert_eq!(book.code(SYMBOL_COUNT), None);
    }

    #[test]
    fn explicit_code_lengths() {
        // 254 codes of length 8 and 3 of length 9 leave one 9-bit code free.
        let mut lengths = [8u8; SYMBOL_COUNT];
        lengths[254..].fill(9);
        let book = Codebook::from_code_lengths(&lengths).unwrap();
        assert_eq!(book.code(0), Some(Code { bits: 0, len: 8 }));
        assert_eq!(book.code(253), Some(Code { bits: 253, len: 8 }));
        assert_eq!(book.eos(), Code { bits: 0b1_1111_1110, len: 9 });

        let data = b"explicit lengths";
        let encoded = encode_to_vec(&book, data);
        assert_eq!(book.inverse().decode(&encoded).unwrap(), data);
    }

    #[test]
    fn explicit_code_lengths_out_of_range() {
        let mut lengths = [9u8; SYMBOL_COUNT];
        lengths[0] = MAX_CODE_LEN + 8;
        assert_eq!(Codebook::from_code_lengths(&lengths), Err(Error::InvalidCode));

        let mut lengths = [9u8; SYMBOL_COUNT];
        lengths[0] = 0;
        assert_eq!(Codebook::from_code_lengths(&lengths), Err(Error::InvalidCode));
    }

    #[test]
    fn explicit_code_lengths_overfull() {
        // 257 one-bit codes cannot form a prefix code.
        let lengths = [1u8; SYMBOL_COUNT];
        assert_eq!(Codebook::from_code_lengths(&lengths), Err(Error::InvalidCode));

        // 257 codes of length 8 is one too many.
        let lengths = [8u8; SYMBOL_COUNT];
        assert_eq!(Codebook::from_code_lengths(&lengths), Err(Error::InvalidCode));
    }

    #[test]
    fn roundtrip_simple_strings() {
        let test_cases: &[&[u8]] = &[
            b"",
            b"a",
            b"hello",
            b"www.example.com",
            b"Mon, 21 Oct 2013 20:13:21 GMT",
            b"text/html; charset=utf-8",
        ];

        for direction in [Direction::Request, Direction::Response] {
            let book = codebook(direction);
            let inverse = inverse_codebook(direction);
            for &input in test_cases {
                let encoded = encode_to_vec(book, input);
                let decoded = inverse.decode(&encoded).unwrap();
                assert_eq!(
                    input,
                    decoded.as_slice(),
                    "roundtrip failed for {:?}",
                    std::str::from_utf8(input)
                );
            }
        }
    }

    #[test]
    fn all_bytes_roundtrip() {
        let input: Vec<u8> = (0..=255).collect();
        for direction in [Direction::Request, Direction::Response] {
            let encoded = encode_to_vec(codebook(direction), &input);
            let decoded = inverse_codebook(direction).decode(&encoded).unwrap();
            assert_eq!(input, decoded);
        }
    }

    #[test]
    fn encoded_len_matches() {
        let book = codebook(Direction::Response);
        let data = b"Mon, 21 Oct 2013 20:13:21 GMT";
        assert_eq!(book.encoded_len(data), encode_to_vec(book, data).len());
        assert_eq!(book.encoded_len(b""), 0);
    }

    #[test]
    fn typical_values_compress() {
        let book = codebook(Direction::Request);
        let data = b"/index.html?query=value";
        assert!(book.encoded_len(data) < data.len());
    }

    #[test]
    fn eos_codes() {
        assert_eq!(
            codebook(Direction::Request).eos(),
            Code {
                bits: 0b110110,
                len: 6
            }
        );
        assert_eq!(
            codebook(Direction::Response).eos(),
            Code {
                bits: 0b10000,
                len: 5
            }
        );
    }

    #[test]
    fn padding_uses_eos_prefix() {
        // 'a' = 01000, pad with 110 from the EOS code.
        assert_eq!(encode_to_vec(codebook(Direction::Request), b"a"), vec![0x46]);
        // 'a' = 01110, pad with 100 from the EOS code.
        assert_eq!(encode_to_vec(codebook(Direction::Response), b"a"), vec![0x74]);
        // '/' = 0000, two of them fill an octet exactly.
        assert_eq!(encode_to_vec(codebook(Direction::Request), b"//"), vec![0x00]);
    }

    #[test]
    fn bad_padding_is_rejected() {
        let inverse = inverse_codebook(Direction::Request);
        assert_eq!(inverse.decode(&[0x46]).unwrap(), b"a");
        // 01000 111: the trailing bits are not a prefix of 110110.
        assert_eq!(inverse.decode(&[0x47]), Err(Error::InvalidCode));
    }

    #[test]
    fn eos_terminates_final_octet() {
        let inverse = inverse_codebook(Direction::Request);
        // 110110 00: EOS then two ignored bits.
        assert_eq!(inverse.decode(&[0xd8]).unwrap(), b"");
        // The same EOS followed by another octet is corrupt.
        assert_eq!(inverse.decode(&[0xd8, 0x00]), Err(Error::InvalidCode));
    }
}
