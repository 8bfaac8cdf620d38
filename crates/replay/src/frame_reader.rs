//! Line reader for replay files
//!
//! One item per line:
//! - `14 00 2a 34 32 00 ...` or `14002a3432...`: a hex-encoded raw frame
//! - `track <id>` / `track off`: change the tracked device
//! - `track-only on|off`: switch strict tracking
//! - blank lines and `#` comments are skipped

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// One parsed replay line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayLine {
    Frame(Bytes),
    Track(Option<i64>),
    TrackOnly(bool),
    /// Unparseable line, with the reason
    Invalid(String),
}

/// Reads replay lines from any buffered async source
pub struct FrameReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Next meaningful line with its 1-based line number, `None` at EOF
    pub async fn next_line(&mut self) -> Result<Option<(usize, ReplayLine)>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .with_context(|| format!("Failed to read line {}", self.line_no + 1))?;
            let Some(line) = line else {
                return Ok(None);
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some((self.line_no, parse_line(trimmed))));
        }
    }
}

fn parse_line(line: &str) -> ReplayLine {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("track") => match words.next() {
            Some("off") => ReplayLine::Track(None),
            Some(id) => match id.parse::<i64>() {
                Ok(id) => ReplayLine::Track(Some(id)),
                Err(_) => ReplayLine::Invalid(format!("bad device id: {}", id)),
            },
            None => ReplayLine::Invalid("track needs a device id or 'off'".into()),
        },
        Some("track-only") => match words.next() {
            Some("on") => ReplayLine::TrackOnly(true),
            Some("off") => ReplayLine::TrackOnly(false),
            _ => ReplayLine::Invalid("track-only needs 'on' or 'off'".into()),
        },
        _ => match decode_hex(line) {
            Ok(bytes) => ReplayLine::Frame(Bytes::from(bytes)),
            Err(reason) => ReplayLine::Invalid(reason),
        },
    }
}

/// Decode hex, ignoring whitespace between digits
fn decode_hex(line: &str) -> std::result::Result<Vec<u8>, String> {
    let digits: Vec<u8> = line.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(|_| "non-ASCII input".to_string())?;
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte '{}'", pair))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_with_spaces() {
        assert_eq!(decode_hex("14 00 2a").unwrap(), vec![0x14, 0x00, 0x2a]);
        assert_eq!(decode_hex("14002A").unwrap(), vec![0x14, 0x00, 0x2a]);
        assert!(decode_hex("140").is_err());
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_parse_directives() {
        assert_eq!(parse_line("track 42"), ReplayLine::Track(Some(42)));
        assert_eq!(parse_line("track off"), ReplayLine::Track(None));
        assert_eq!(parse_line("track-only on"), ReplayLine::TrackOnly(true));
        assert_eq!(parse_line("track-only off"), ReplayLine::TrackOnly(false));
        assert!(matches!(parse_line("track x"), ReplayLine::Invalid(_)));
        assert!(matches!(parse_line("track-only"), ReplayLine::Invalid(_)));
    }

    #[tokio::test]
    async fn test_reader_skips_comments_and_blanks() {
        let input = "# header\n\n40 00 04 39 39\ntrack 7\n";
        let mut reader = FrameReader::new(input.as_bytes());

        let (no, line) = reader.next_line().await.unwrap().unwrap();
        assert_eq!(no, 3);
        assert_eq!(line, ReplayLine::Frame(Bytes::from_static(&[0x40, 0, 4, b'9', b'9'])));

        let (no, line) = reader.next_line().await.unwrap().unwrap();
        assert_eq!(no, 4);
        assert_eq!(line, ReplayLine::Track(Some(7)));

        assert!(reader.next_line().await.unwrap().is_none());
    }
}
