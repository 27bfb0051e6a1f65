//! Header set decoder.

use crate::config::DecoderConfig;
use crate::context::EncodingContext;
use crate::error::Result;
use crate::header::HeaderField;
use crate::huffman::{InverseCodebook, inverse_codebook};
use crate::metrics::{BYTES_DECODED, DECODE_ERRORS, HEADER_SETS_DECODED};
use crate::opcode::{Name, Representation};
use crate::table::TableUpdate;
use crate::wire::Reader;

/// Decodes header sets produced by a peer
/// [`HeaderEncoder`](crate::HeaderEncoder).
///
/// After a failed decode the context may no longer match the encoder's;
/// the connection it belongs to should be abandoned.
#[derive(Debug, Clone)]
pub struct HeaderDecoder {
    context: EncodingContext,
    inverse: &'static InverseCodebook,
}

impl Default for HeaderDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl HeaderDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            context: EncodingContext::with_max_size(config.direction, config.max_table_size),
            inverse: inverse_codebook(config.direction),
        }
    }

    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    /// Changes the header table size to match the peer encoder.
    pub fn set_header_table_max_size(&mut self, max_size: usize) -> TableUpdate {
        self.context.set_header_table_max_size(max_size)
    }

    /// Decodes one complete header set, calling `emit` with the name and
    /// value of every header in it.
    ///
    /// Headers carried over in the reference set are emitted last.
    pub fn decode_header_set<F>(&mut self, buf: &[u8], mut emit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]),
    {
        let result = self.decode_representations(buf, &mut emit);
        self.context.clear_all_touches();

        match &result {
            Ok(headers) => {
                HEADER_SETS_DECODED.increment();
                BYTES_DECODED.add(buf.len() as u64);
                tracing::debug!(
                    headers,
                    encoded = buf.len(),
                    table_size = self.context.table().size(),
                    table_entries = self.context.table().len(),
                    "decoded header set"
                );
            }
            Err(error) => {
                DECODE_ERRORS.increment();
                tracing::warn!(%error, encoded = buf.len(), "header set decode failed");
            }
        }
        result.map(|_| ())
    }

    /// Decodes one complete header set into a list.
    pub fn decode(&mut self, buf: &[u8]) -> Result<Vec<HeaderField>> {
        let mut headers = Vec::new();
        self.decode_header_set(buf, |name, value| {
            headers.push(HeaderField::new(name, value));
        })?;
        Ok(headers)
    }

    fn decode_representations<F>(&mut self, buf: &[u8], emit: &mut F) -> Result<usize>
    where
        F: FnMut(&[u8], &[u8]),
    {
        let mut reader = Reader::new(buf);
        let mut emitted = 0;

        while reader.has_remaining() {
            let offset = reader.position();
            let repr = Representation::decode(&mut reader, self.inverse)?;
            tracing::trace!(kind = repr.kind(), offset, "decode representation");

            match repr {
                Representation::Indexed { index } => {
                    if self.context.process_indexed_header(index)? {
                        self.context.add_touches(index, 0)?;
                        emit(self.context.name(index)?, self.context.value(index)?);
                        emitted += 1;
                    }
                }
                Representation::LiteralNoIndex { name, value } => {
                    let name = self.resolve_name(name)?;
                    self.context
                        .process_literal_header_without_indexing(&name, &value)?;
                    emit(&name, &value);
                    emitted += 1;
                }
                Representation::LiteralIncremental { name, value } => {
                    let name = self.resolve_name(name)?;
                    let update = self
                        .context
                        .process_literal_header_with_incremental_indexing(&name, &value)?;
                    self.touch_stored(&update)?;
                    emit(&name, &value);
                    emitted += 1;
                }
                Representation::LiteralSubstitution {
                    name,
                    substituted,
                    value,
                } => {
                    let name = self.resolve_name(name)?;
                    let update = self
                        .context
                        .process_literal_header_with_substitution_indexing(
                            &name,
                            substituted,
                            &value,
                        )?;
                    self.touch_stored(&update)?;
                    emit(&name, &value);
                    emitted += 1;
                }
            }
        }

        for index in self.context.untouched_references() {
            emit(self.context.name(index)?, self.context.value(index)?);
            emitted += 1;
        }
        Ok(emitted)
    }

    // Name indices refer to the table before the representation is applied.
    fn resolve_name(&self, name: Name<'static>) -> Result<Vec<u8>> {
        match name {
            Name::Index(index) => Ok(self.context.name(index)?.to_vec()),
            Name::Literal(name) => Ok(name.into_owned()),
        }
    }

    fn touch_stored(&mut self, update: &TableUpdate) -> Result<()> {
        match update.index {
            Some(index) => self.context.add_touches(index, 0),
            None => Ok(()),
        }
    }
}
