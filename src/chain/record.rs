//! Record Tokenizer
//!
//! Splits one log line into its timestamp and digest fields. Tokenizing
//! never fails: a line that is not a well-formed record comes back as
//! [`ParsedLine::Malformed`] with the reason attached.

use std::borrow::Cow;
use std::fmt;

/// Required length of the timestamp token, in characters
pub const TIMESTAMP_LEN: usize = 26;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// A well-formed record borrowed from its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub timestamp: &'a [u8],
    pub digest: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn timestamp_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.timestamp)
    }

    pub fn digest_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.digest)
    }
}

/// Why a line is not a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The line did not split into exactly two tokens
    TokenCount { found: usize },
    /// The timestamp token is not [`TIMESTAMP_LEN`] characters long
    TimestampLength { found: usize },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::TokenCount { found } => {
                write!(f, "expected 2 tokens, found {}", found)
            }
            MalformedReason::TimestampLength { found } => {
                write!(f, "timestamp is {} characters, expected {}", found, TIMESTAMP_LEN)
            }
        }
    }
}

/// Tagged result of tokenizing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Record(Record<'a>),
    Malformed(MalformedReason),
}

/// Field separators: ASCII whitespace plus vertical tab and the
/// file/group/record/unit separators
fn is_separator(b: &u8) -> bool {
    b.is_ascii_whitespace() || matches!(*b, 0x0b | 0x1c..=0x1f)
}

/// Drop the line terminator (`\n` or `\r\n`) from a line read with
/// `read_until(b'\n', ..)`. What remains is the record's raw bytes.
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Tokenize the raw bytes of one line
pub fn tokenize(raw: &[u8]) -> ParsedLine<'_> {
    let mut tokens = raw
        .split(is_separator)
        .filter(|token| !token.is_empty());

    let (timestamp, digest) = match (tokens.next(), tokens.next()) {
        (Some(timestamp), Some(digest)) => (timestamp, digest),
        (first, _) => {
            return ParsedLine::Malformed(MalformedReason::TokenCount {
                found: usize::from(first.is_some()),
            })
        }
    };

    let extra = tokens.count();
    if extra > 0 {
        return ParsedLine::Malformed(MalformedReason::TokenCount { found: 2 + extra });
    }

    let timestamp_len = String::from_utf8_lossy(timestamp).chars().count();
    if timestamp_len != TIMESTAMP_LEN {
        return ParsedLine::Malformed(MalformedReason::TimestampLength {
            found: timestamp_len,
        });
    }

    ParsedLine::Record(Record { timestamp, digest })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-01-01T00:00:00.000000";

    #[test]
    fn test_well_formed_record() {
        let line = format!("{} {}", TS, "ab".repeat(32));
        match tokenize(line.as_bytes()) {
            ParsedLine::Record(record) => {
                assert_eq!(record.timestamp_str(), TS);
                assert_eq!(record.digest.len(), DIGEST_HEX_LEN);
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_token_count() {
        assert_eq!(
            tokenize(b""),
            ParsedLine::Malformed(MalformedReason::TokenCount { found: 0 })
        );
        assert_eq!(
            tokenize(b"   \t "),
            ParsedLine::Malformed(MalformedReason::TokenCount { found: 0 })
        );
        assert_eq!(
            tokenize(TS.as_bytes()),
            ParsedLine::Malformed(MalformedReason::TokenCount { found: 1 })
        );
        let three = format!("{} abc def", TS);
        assert_eq!(
            tokenize(three.as_bytes()),
            ParsedLine::Malformed(MalformedReason::TokenCount { found: 3 })
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let line = format!("  {}\t\tdeadbeef  ", TS);
        assert!(matches!(tokenize(line.as_bytes()), ParsedLine::Record(_)));
    }

    #[test]
    fn test_vertical_tab_and_unit_separator_split_tokens() {
        for sep in ["\x0b", "\x1f", "\x0c"] {
            let line = format!("{}{}{}", TS, sep, "0".repeat(64));
            match tokenize(line.as_bytes()) {
                ParsedLine::Record(record) => assert_eq!(record.timestamp_str(), TS),
                other => panic!("separator {:?} not accepted: {:?}", sep, other),
            }
        }
    }

    #[test]
    fn test_timestamp_length_boundary() {
        for len in [25usize, 27] {
            let line = format!("{} {}", "x".repeat(len), "0".repeat(64));
            assert_eq!(
                tokenize(line.as_bytes()),
                ParsedLine::Malformed(MalformedReason::TimestampLength { found: len })
            );
        }
        let line = format!("{} {}", "x".repeat(26), "0".repeat(64));
        assert!(matches!(tokenize(line.as_bytes()), ParsedLine::Record(_)));
    }

    #[test]
    fn test_timestamp_length_counts_characters() {
        // 25 ASCII characters plus one two-byte character
        let ts = format!("{}é", "x".repeat(25));
        let line = format!("{} {}", ts, "0".repeat(64));
        assert!(matches!(tokenize(line.as_bytes()), ParsedLine::Record(_)));
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator(b"abc\n"), b"abc");
        assert_eq!(strip_terminator(b"abc\r\n"), b"abc");
        assert_eq!(strip_terminator(b"abc"), b"abc");
        assert_eq!(strip_terminator(b"abc \n"), b"abc ");
        assert_eq!(strip_terminator(b"\n"), b"");
    }

    #[test]
    fn test_non_utf8_does_not_panic() {
        let line = [0xffu8, 0xfe, b' ', 0x80];
        assert!(matches!(
            tokenize(&line),
            ParsedLine::Malformed(MalformedReason::TimestampLength { .. })
        ));
    }
}
