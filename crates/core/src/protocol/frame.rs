//! Frame envelope parsing
//!
//! Every inbound frame starts with a fixed 3-byte envelope:
//!
//! ```text
//! +---------+-----------------+---------------------+
//! | command | message id (BE) | body[0..]           |
//! | 1 byte  | 2 bytes         | UTF-8, \0-separated |
//! +---------+-----------------+---------------------+
//! ```
//!
//! The body length is implied by the transport's message boundary.

use bytes::Bytes;

use crate::error::{CoreError, Result};
use crate::protocol::body::{decode_fields, FieldList};
use crate::HEADER_SIZE;

/// Decoded frame envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Raw command code
    pub command: u8,
    /// Request/response correlation id
    pub message_id: u16,
}

impl FrameHeader {
    pub fn new(command: u8, message_id: u16) -> Self {
        Self {
            command,
            message_id,
        }
    }

    /// Split a raw buffer into header and body view
    ///
    /// Returns `MalformedFrame` if the buffer is shorter than the envelope.
    pub fn parse(raw: &[u8]) -> Result<(Self, &[u8])> {
        if raw.len() < HEADER_SIZE {
            return Err(CoreError::truncated(raw.len()));
        }
        let header = Self {
            command: raw[0],
            message_id: u16::from_be_bytes([raw[1], raw[2]]),
        };
        Ok((header, &raw[HEADER_SIZE..]))
    }
}

/// A complete inbound frame
///
/// The body shares the transport buffer (`Bytes::slice`), so parsing never
/// copies payload data.
#[derive(Debug, Clone)]
pub struct Frame {
    pub header: FrameHeader,
    pub body: Bytes,
}

impl Frame {
    /// Parse an owned transport buffer
    pub fn parse(raw: Bytes) -> Result<Self> {
        let (header, _) = FrameHeader::parse(&raw)?;
        Ok(Self {
            header,
            body: raw.slice(HEADER_SIZE..),
        })
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.header.command
    }

    #[inline]
    pub fn message_id(&self) -> u16 {
        self.header.message_id
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body into its field list
    pub fn fields(&self) -> Result<FieldList> {
        decode_fields(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let raw = [20u8, 0x01, 0x02, b'4', b'2'];
        let (header, body) = FrameHeader::parse(&raw).unwrap();
        assert_eq!(header.command, 20);
        assert_eq!(header.message_id, 0x0102);
        assert_eq!(body, b"42");
    }

    #[test]
    fn test_header_only_frame_has_empty_body() {
        let (header, body) = FrameHeader::parse(&[0, 0, 7]).unwrap();
        assert_eq!(header, FrameHeader::new(0, 7));
        assert!(body.is_empty());
    }

    #[test]
    fn test_truncated_buffers_rejected() {
        for len in 0..HEADER_SIZE {
            let raw = vec![1u8; len];
            let err = FrameHeader::parse(&raw).unwrap_err();
            assert!(matches!(err, CoreError::MalformedFrame(_)));
        }
    }

    #[test]
    fn test_frame_body_is_zero_copy() {
        let raw = Bytes::from(vec![25u8, 0, 9, b'a', 0, b'b']);
        let frame = Frame::parse(raw.clone()).unwrap();
        assert_eq!(frame.command(), 25);
        assert_eq!(frame.message_id(), 9);
        assert_eq!(frame.body(), b"a\0b");
        assert_eq!(frame.body.as_ptr(), raw[HEADER_SIZE..].as_ptr());
        assert_eq!(frame.fields().unwrap().as_slice(), ["a", "b"]);
    }
}
