//! Shared parsing utilities for all formats.
//!
//! This module holds what both parsers need before and after their
//! format-specific work: byte decoding and per-record skip bookkeeping.

#[cfg(feature = "telegram")]
pub mod telegram;

#[cfg(feature = "whatsapp")]
pub mod whatsapp;

use crate::Message;
use crate::config::Encoding;
use crate::error::{ChatwindowError, Result};
use crate::events::{Event, EventSink, SkipReason};

const BOM: char = '\u{FEFF}';

/// Decodes raw export bytes into text.
///
/// A leading byte-order mark is removed. Invalid sequences are never
/// replaced; they fail the whole decode with [`ChatwindowError::Encoding`].
///
/// # Example
///
/// ```rust
/// use chatwindow::config::Encoding;
/// use chatwindow::parsing::decode;
///
/// let text = decode("\u{FEFF}hello".as_bytes(), Encoding::Utf8).unwrap();
/// assert_eq!(text, "hello");
/// assert!(decode(&[0xff, 0xfe, 0xfd], Encoding::Utf8).is_err());
/// ```
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<String> {
    let text = match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes)
            .map(ToString::to_string)
            .map_err(|e| {
                ChatwindowError::encoding(
                    encoding.label(),
                    format!("invalid byte sequence at offset {}", e.valid_up_to()),
                )
            })?,
        Encoding::Utf16Le | Encoding::Utf16Be => decode_utf16(bytes, encoding)?,
    };

    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn decode_utf16(bytes: &[u8], encoding: Encoding) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(ChatwindowError::encoding(
            encoding.label(),
            format!("odd number of bytes ({})", bytes.len()),
        ));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if encoding == Encoding::Utf16Be {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        })
        .collect();

    String::from_utf16(&units)
        .map_err(|_| ChatwindowError::encoding(encoding.label(), "unpaired surrogate"))
}

/// Per-record skip bookkeeping shared by the parsers.
///
/// Every skipped record is reported to the sink. With `skip_invalid` off, a
/// record failure (anything but a system marker) aborts the parse instead.
pub(crate) struct SkipLog<'a> {
    format: &'static str,
    sink: &'a dyn EventSink,
    skip_invalid: bool,
    skipped: usize,
}

impl<'a> SkipLog<'a> {
    pub(crate) fn new(format: &'static str, sink: &'a dyn EventSink, skip_invalid: bool) -> Self {
        Self {
            format,
            sink,
            skip_invalid,
            skipped: 0,
        }
    }

    /// Records one skipped record.
    pub(crate) fn skip(&mut self, record: usize, reason: SkipReason) -> Result<()> {
        if !self.skip_invalid && reason != SkipReason::SystemMarker {
            return Err(ChatwindowError::malformed_record(
                self.format,
                format!("record {record}: {reason}"),
            ));
        }

        self.skipped += 1;
        self.sink.emit(&Event::RecordSkipped {
            format: self.format,
            record,
            reason,
        });
        Ok(())
    }

    /// Reports the totals and rejects an empty result.
    pub(crate) fn finish(self, messages: Vec<Message>) -> Result<Vec<Message>> {
        self.sink.emit(&Event::MessagesParsed {
            format: self.format,
            parsed: messages.len(),
            skipped: self.skipped,
        });

        if messages.is_empty() {
            return Err(ChatwindowError::NoValidMessages {
                format: self.format,
                skipped: self.skipped,
            });
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::events::testing::RecordingSink;

    #[test]
    fn test_decode_utf8_strips_bom() {
        let bytes = "\u{FEFF}Привет".as_bytes();
        assert_eq!(decode(bytes, Encoding::Utf8).unwrap(), "Привет");
    }

    #[test]
    fn test_decode_utf8_invalid() {
        let err = decode(b"ok\xff", Encoding::Utf8).unwrap_err();
        assert!(err.is_encoding());
        assert!(err.to_string().contains("offset 2"));
    }

    #[test]
    fn test_decode_utf16le() {
        let bytes: Vec<u8> = "\u{FEFF}hi"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        assert_eq!(decode(&bytes, Encoding::Utf16Le).unwrap(), "hi");
    }

    #[test]
    fn test_decode_utf16be() {
        let bytes: Vec<u8> = "Ёж".encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode(&bytes, Encoding::Utf16Be).unwrap(), "Ёж");
    }

    #[test]
    fn test_decode_utf16_errors() {
        assert!(decode(&[0x41], Encoding::Utf16Le).unwrap_err().is_encoding());
        // lone high surrogate
        assert!(
            decode(&[0x00, 0xD8], Encoding::Utf16Le)
                .unwrap_err()
                .is_encoding()
        );
    }

    #[test]
    fn test_skip_log_reports_and_counts() {
        let sink = RecordingSink::default();
        let mut log = SkipLog::new("WhatsApp TXT", &sink, true);
        log.skip(0, SkipReason::MalformedRecord).unwrap();
        log.skip(4, SkipReason::SystemMarker).unwrap();

        let err = log.finish(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ChatwindowError::NoValidMessages { skipped: 2, .. }
        ));
        assert_eq!(sink.events().len(), 3);
    }

    #[test]
    fn test_skip_log_strict_mode() {
        let mut log = SkipLog::new("WhatsApp TXT", &NullSink, false);
        assert!(log.skip(1, SkipReason::SystemMarker).is_ok());
        assert!(log.skip(2, SkipReason::InvalidDate).unwrap_err().is_malformed());
    }
}
