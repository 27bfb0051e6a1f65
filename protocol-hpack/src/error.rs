//! Error types for header-set encoding and decoding.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while encoding or decoding a header set.
///
/// Every error is fatal to the call in progress. A failed decode means the
/// decoder's header table may no longer mirror the encoder's, so callers
/// should discard the context rather than keep using it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Header name does not match `:?[-!#$%&'*+.^_`|~0-9a-z]+`.
    #[error("invalid header name: {:?}", String::from_utf8_lossy(.0))]
    InvalidHeaderName(Vec<u8>),

    /// Header value violates the value rule. Any octet sequence satisfies the
    /// current rule, so this is only produced by misuse of the table API.
    #[error("invalid header value")]
    InvalidHeaderValue,

    /// Reference to a header table position that does not exist.
    #[error("invalid header table index: {0}")]
    InvalidIndex(usize),

    /// Input ended in the middle of a field.
    #[error("unexpected end of buffer")]
    UnexpectedEndOfBuffer,

    /// The next octet matches no known header representation.
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    /// Huffman bitstream contains no valid prefix code.
    #[error("invalid huffman code")]
    InvalidCode,

    /// Prefix integer does not fit in 64 bits.
    #[error("integer overflow")]
    IntegerOverflow,
}

impl Error {
    /// Returns true if the error was caused by truncated input.
    #[inline]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::UnexpectedEndOfBuffer)
    }
}
