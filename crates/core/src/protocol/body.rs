//! Body decoding: UTF-8 text split on `\0`
//!
//! Field positions are command specific, so the split never trims or drops
//! empty fields. Every accessor is bounds-checked; a short frame yields
//! `None` for the missing positions instead of failing.

use crate::error::Result;

/// Field separator inside a frame body
pub const FIELD_SEPARATOR: char = '\0';

/// Prefix some device ids carry on the wire
pub const DEVICE_ID_PREFIX: &str = "0-";

/// Ordered list of body fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Split already-decoded body text
    pub fn split(text: &str) -> Self {
        Self(text.split(FIELD_SEPARATOR).map(str::to_owned).collect())
    }

    /// Field at `index`, or `None` past the end
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Device id at `index` with the `0-` prefix removed
    pub fn device_id(&self, index: usize) -> Option<&str> {
        self.get(index).map(strip_device_prefix)
    }

    /// Numeric value of the field at `index`
    pub fn numeric(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(parse_numeric)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for FieldList {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

/// Decode a frame body into its field list
///
/// Fails with `InvalidEncoding` if the body is not valid UTF-8.
pub fn decode_fields(body: &[u8]) -> Result<FieldList> {
    let text = std::str::from_utf8(body)?;
    Ok(FieldList::split(text))
}

/// Remove a leading `0-` from a device id
///
/// Idempotent: ids without the prefix are returned unchanged.
pub fn strip_device_prefix(raw: &str) -> &str {
    raw.strip_prefix(DEVICE_ID_PREFIX).unwrap_or(raw)
}

/// Parse a decimal field into an integer
///
/// Accepts surrounding whitespace, leading zeros and integral floats
/// (`"7.0"`). Empty, non-numeric or fractional input yields `None`.
pub fn parse_numeric(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn test_trailing_empty_field_preserved() {
        let fields = decode_fields(b"0-42\x002\x00517\x00").unwrap();
        assert_eq!(fields.as_slice(), ["0-42", "2", "517", ""]);
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_empty_body_yields_single_empty_field() {
        let fields = decode_fields(b"").unwrap();
        assert_eq!(fields.as_slice(), [""]);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = decode_fields(&[b'4', 0, 0xc3, 0x28]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidEncoding(_)));
    }

    #[test]
    fn test_out_of_range_access_is_none() {
        let fields = FieldList::split("7");
        assert_eq!(fields.get(0), Some("7"));
        assert_eq!(fields.get(3), None);
        assert_eq!(fields.numeric(2), None);
    }

    #[test]
    fn test_strip_prefix_idempotent() {
        assert_eq!(strip_device_prefix("0-42"), "42");
        assert_eq!(strip_device_prefix("42"), "42");
        assert_eq!(strip_device_prefix(strip_device_prefix("0-42")), "42");
        // only a leading prefix is removed
        assert_eq!(strip_device_prefix("10-5"), "10-5");
    }

    #[test]
    fn test_device_id_accessor_strips() {
        let fields = FieldList::split("0-15\0");
        assert_eq!(fields.device_id(0), Some("15"));
        assert_eq!(fields.device_id(1), Some(""));
        assert_eq!(fields.device_id(2), None);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(42));
        assert_eq!(parse_numeric("007"), Some(7));
        assert_eq!(parse_numeric(" 3 "), Some(3));
        assert_eq!(parse_numeric("-1"), Some(-1));
        assert_eq!(parse_numeric("7.0"), Some(7));
        assert_eq!(parse_numeric("7.5"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("on"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }
}
