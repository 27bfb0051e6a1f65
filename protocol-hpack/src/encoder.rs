//! Header set encoder.

use std::borrow::Cow;

use bytes::{Bytes, BytesMut};

use crate::config::{CompressionLevel, EncoderConfig};
use crate::context::EncodingContext;
use crate::error::Result;
use crate::header::{HeaderField, validate_name, validate_value};
use crate::huffman::{Codebook, codebook};
use crate::metrics::{BYTES_ENCODED, HEADER_SETS_ENCODED};
use crate::opcode::{Name, Representation};
use crate::table::TableUpdate;

/// Encodes header sets against an [`EncodingContext`] that a peer
/// [`HeaderDecoder`](crate::HeaderDecoder) mirrors.
///
/// Header sets must be decoded in the order they were encoded.
#[derive(Debug, Clone)]
pub struct HeaderEncoder {
    context: EncodingContext,
    level: CompressionLevel,
    codebook: Option<&'static Codebook>,
}

impl Default for HeaderEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl HeaderEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            context: EncodingContext::with_max_size(config.direction, config.max_table_size),
            level: config.compression_level,
            codebook: config.huffman.then(|| codebook(config.direction)),
        }
    }

    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    pub fn compression_level(&self) -> CompressionLevel {
        self.level
    }

    /// Changes the header table size. The peer decoder must be told the
    /// same size before it decodes the next header set.
    pub fn set_header_table_max_size(&mut self, max_size: usize) -> TableUpdate {
        self.context.set_header_table_max_size(max_size)
    }

    /// Encodes one header set into a new buffer.
    pub fn encode_header_set(&mut self, headers: &[HeaderField]) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(headers, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Encodes one header set, appending to `dst`.
    ///
    /// Every header is validated before the context changes, so an invalid
    /// name or value leaves both `dst` and the context untouched.
    pub fn encode(&mut self, headers: &[HeaderField], dst: &mut BytesMut) -> Result<()> {
        for header in headers {
            validate_name(&header.name)?;
            validate_value(&header.value)?;
        }

        let start = dst.len();
        let result = self.encode_headers(headers, dst);
        self.context.clear_all_touches();
        result?;

        let encoded = dst.len() - start;
        HEADER_SETS_ENCODED.increment();
        BYTES_ENCODED.add(encoded as u64);
        tracing::debug!(
            headers = headers.len(),
            encoded,
            table_size = self.context.table().size(),
            table_entries = self.context.table().len(),
            "encoded header set"
        );
        Ok(())
    }

    fn encode_headers(&mut self, headers: &[HeaderField], dst: &mut BytesMut) -> Result<()> {
        for header in headers {
            self.encode_header(&header.name, &header.value, dst)?;
        }

        // Referenced entries that were not part of this header set leave the
        // reference set.
        for index in self.context.untouched_references() {
            self.emit(dst, &Representation::Indexed { index });
            self.context.process_indexed_header(index)?;
        }
        Ok(())
    }

    fn encode_header(&mut self, name: &[u8], value: &[u8], dst: &mut BytesMut) -> Result<()> {
        if self.level >= CompressionLevel::INDEXED {
            if let Some(index) = self.context.find_index_with_name_and_value(name, value) {
                return self.encode_indexed(index, dst);
            }
        }

        let name_index = if self.level >= CompressionLevel::NAME_REFERENCE {
            self.context.find_index_with_name(name)
        } else {
            None
        };

        match name_index {
            Some(index) if self.level >= CompressionLevel::SUBSTITUTION => {
                let mut vanishing = self.context.table().plan_replace(index, name, value)?;
                if !vanishing.contains(&index) {
                    vanishing.push(index);
                }
                self.flush_deferred(&vanishing, dst)?;

                self.emit(
                    dst,
                    &Representation::LiteralSubstitution {
                        name: Name::Index(index),
                        substituted: index,
                        value: Cow::Borrowed(value),
                    },
                );
                let update = self
                    .context
                    .process_literal_header_with_substitution_indexing(name, index, value)?;
                if let Some(index) = update.index {
                    self.context.add_touches(index, 1)?;
                }
            }
            None if self.level >= CompressionLevel::INCREMENTAL => {
                let vanishing = self.context.table().plan_append(name, value);
                self.flush_deferred(&vanishing, dst)?;

                self.emit(
                    dst,
                    &Representation::LiteralIncremental {
                        name: Name::Literal(Cow::Borrowed(name)),
                        value: Cow::Borrowed(value),
                    },
                );
                let update = self
                    .context
                    .process_literal_header_with_incremental_indexing(name, value)?;
                if let Some(index) = update.index {
                    self.context.add_touches(index, 1)?;
                }
            }
            _ => {
                self.context.process_literal_header_without_indexing(name, value)?;
                let name = match name_index {
                    Some(index) => Name::Index(index),
                    None => Name::Literal(Cow::Borrowed(name)),
                };
                self.emit(
                    dst,
                    &Representation::LiteralNoIndex {
                        name,
                        value: Cow::Borrowed(value),
                    },
                );
            }
        }
        Ok(())
    }

    // Exact match at `index`. Touch counts record how many times the header
    // has been sent explicitly during this header set; `Some(0)` means it
    // was seen once but left to the reference set.
    fn encode_indexed(&mut self, index: usize, dst: &mut BytesMut) -> Result<()> {
        if !self.context.is_referenced(index)? {
            self.emit(dst, &Representation::Indexed { index });
            self.context.process_indexed_header(index)?;
            return self.context.add_touches(index, 1);
        }

        match self.context.touch_count(index)? {
            None => self.context.add_touches(index, 0),
            Some(0) => {
                // Once for the earlier, implicit occurrence and once for this one.
                self.reaffirm(index, dst)?;
                self.reaffirm(index, dst)
            }
            Some(_) => self.reaffirm(index, dst),
        }
    }

    // Sends a referenced entry explicitly: two indexed representations
    // toggle it off and on again, and the decoder emits it on the second.
    fn reaffirm(&mut self, index: usize, dst: &mut BytesMut) -> Result<()> {
        for _ in 0..2 {
            self.emit(dst, &Representation::Indexed { index });
            self.context.process_indexed_header(index)?;
        }
        self.context.add_touches(index, 1)
    }

    // Entries about to be evicted or replaced that the decoder would
    // otherwise only emit from the reference set at the end of the header
    // set.
    fn flush_deferred(&mut self, indices: &[usize], dst: &mut BytesMut) -> Result<()> {
        for &index in indices {
            if self.context.is_referenced(index)? && self.context.touch_count(index)? == Some(0) {
                self.reaffirm(index, dst)?;
            }
        }
        Ok(())
    }

    fn emit(&self, dst: &mut BytesMut, repr: &Representation<'_>) {
        tracing::trace!(kind = repr.kind(), "encode representation");
        repr.encode(dst, self.codebook);
    }
}
