//! Header fields and the octet rules they must satisfy.

use crate::error::{Error, Result};

/// Per-entry overhead added to `len(name) + len(value)` for table accounting.
pub const ENTRY_OVERHEAD: usize = 32;

/// A single header name-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderField {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl HeaderField {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Size of this field for header table accounting.
    pub fn size(&self) -> usize {
        entry_size(&self.name, &self.value)
    }
}

impl<N, V> From<(N, V)> for HeaderField
where
    N: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

#[inline]
pub(crate) fn entry_size(name: &[u8], value: &[u8]) -> usize {
    name.len() + value.len() + ENTRY_OVERHEAD
}

/// Returns whether `name` matches `:?[-!#$%&'*+.^_`|~0-9a-z]+`.
pub fn is_valid_header_name(name: &[u8]) -> bool {
    let body = match name {
        [b':', rest @ ..] => rest,
        _ => name,
    };
    !body.is_empty() && body.iter().all(|&b| is_name_octet(b))
}

#[inline]
fn is_name_octet(b: u8) -> bool {
    matches!(b,
        b'-' | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'.'
        | b'^' | b'_' | b'`' | b'|' | b'~' | b'0'..=b'9' | b'a'..=b'z')
}

/// Returns whether `value` satisfies the header value rule.
///
/// Values are arbitrary octet sequences, so every byte string passes.
#[inline]
pub fn is_valid_header_value(_value: &[u8]) -> bool {
    true
}

pub(crate) fn validate_name(name: &[u8]) -> Result<()> {
    if is_valid_header_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidHeaderName(name.to_vec()))
    }
}

pub(crate) fn validate_value(value: &[u8]) -> Result<()> {
    if is_valid_header_value(value) {
        Ok(())
    } else {
        Err(Error::InvalidHeaderValue)
    }
}

/// Compares two octet strings without short-circuiting on the first
/// mismatching octet.
///
/// Only the lengths leak through timing.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_size() {
        assert_eq!(HeaderField::new(b":method", b"GET").size(), 7 + 3 + 32);
        assert_eq!(HeaderField::new(b"x", b"").size(), 33);
    }

    #[test]
    fn valid_names() {
        for name in [
            &b":method"[..],
            b":path",
            b"content-type",
            b"x-custom_1",
            b"a",
            b"!#$%&'*+.^_`|~",
        ] {
            assert!(is_valid_header_name(name), "{:?}", name);
        }
    }

    #[test]
    fn invalid_names() {
        for name in [
            &b""[..],
            b":",
            b"::method",
            b"Content-Type",
            b"has space",
            b"colon:inside",
            b"tab\t",
            b"\xff",
        ] {
            assert!(!is_valid_header_name(name), "{:?}", name);
        }
        assert_eq!(
            validate_name(b"Host"),
            Err(Error::InvalidHeaderName(b"Host".to_vec()))
        );
    }

    #[test]
    fn any_value_is_valid() {
        let all: Vec<u8> = (0..=255).collect();
        assert!(is_valid_header_value(&all));
        assert!(is_valid_header_value(b""));
        assert!(validate_value(b"\x00\r\n").is_ok());
    }

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"gzip", b"gzip"));
        assert!(!constant_time_eq(b"gzip", b"gzjp"));
        assert!(!constant_time_eq(b"gzip", b"gzi"));
        assert!(!constant_time_eq(b"a", b""));
    }

    #[test]
    fn from_tuple() {
        let field: HeaderField = (":status", "200").into();
        assert_eq!(field, HeaderField::new(b":status", b"200"));
    }
}
