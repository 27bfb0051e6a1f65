//! Encoder and decoder configuration.

use crate::static_table::Direction;
use crate::table::DEFAULT_MAX_SIZE;

/// How aggressively the encoder reuses the header table.
///
/// Each level enables one more strategy on top of the previous ones:
///
/// | Level | Adds |
/// |---|---|
/// | 0 | nothing, every header is a literal with a literal name |
/// | 1 | literal headers reuse a matching entry's name |
/// | 2 | exact matches are sent as indexed headers and kept in the reference set |
/// | 3 | literals with a known name replace that entry |
/// | 4 | literals with an unknown name are appended to the table |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const NONE: Self = Self(0);
    pub const NAME_REFERENCE: Self = Self(1);
    pub const INDEXED: Self = Self(2);
    pub const SUBSTITUTION: Self = Self(3);
    pub const INCREMENTAL: Self = Self(4);

    /// Returns `None` for levels above 4.
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::INCREMENTAL.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::INCREMENTAL
    }
}

/// Header encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Selects the seed table and Huffman codebook. Default `Request`.
    pub direction: Direction,
    /// Default [`CompressionLevel::INCREMENTAL`].
    pub compression_level: CompressionLevel,
    /// Header table size in octets. Default 4096.
    pub max_table_size: usize,
    /// Huffman-code string literals when it makes them shorter. Default on.
    pub huffman: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Request,
            compression_level: CompressionLevel::INCREMENTAL,
            max_table_size: DEFAULT_MAX_SIZE,
            huffman: true,
        }
    }
}

impl EncoderConfig {
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub const fn compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }

    pub const fn max_table_size(mut self, max_table_size: usize) -> Self {
        self.max_table_size = max_table_size;
        self
    }

    pub const fn huffman(mut self, huffman: bool) -> Self {
        self.huffman = huffman;
        self
    }
}

/// Header decoder configuration. Must match the peer encoder's direction
/// and table size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub direction: Direction,
    pub max_table_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Request,
            max_table_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl DecoderConfig {
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub const fn max_table_size(mut self, max_table_size: usize) -> Self {
        self.max_table_size = max_table_size;
        self
    }
}

impl From<&EncoderConfig> for DecoderConfig {
    /// The decoder configuration that mirrors an encoder.
    fn from(config: &EncoderConfig) -> Self {
        Self {
            direction: config.direction,
            max_table_size: config.max_table_size,
        }
    }
}
