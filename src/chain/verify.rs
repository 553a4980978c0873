//! Chain Verification
//!
//! Walks a log source line by line, carrying the raw bytes of the previous
//! line forward and checking every record's digest field against them.
//! Violations never stop the scan; they are collected into a [`Verdict`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;
use tracing::{debug, error, info};

use crate::chain::digest::{digest_hex, digest_matches};
use crate::chain::record::{strip_terminator, tokenize, MalformedReason, ParsedLine};
use crate::error::LogChainError;

/// What a malformed line contributes to the next link check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedLinePolicy {
    /// The malformed line's bytes are still what the next record must
    /// commit to
    #[default]
    CarryForward,
    /// A malformed line ends the chain; the next line starts a new one and
    /// is exempt from the digest check
    BreakChain,
}

impl MalformedLinePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedLinePolicy::CarryForward => "carry-forward",
            MalformedLinePolicy::BreakChain => "break-chain",
        }
    }
}

impl fmt::Display for MalformedLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformedLinePolicy {
    type Err = LogChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry-forward" | "carry_forward" => Ok(MalformedLinePolicy::CarryForward),
            "break-chain" | "break_chain" => Ok(MalformedLinePolicy::BreakChain),
            other => Err(LogChainError::unknown_policy(other)),
        }
    }
}

/// Kind of chain violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    Structural { token_count: usize },
    TimestampFormat { length: usize },
    DigestMismatch {
        timestamp: String,
        expected: String,
        found: String,
    },
}

impl From<MalformedReason> for ViolationKind {
    fn from(reason: MalformedReason) -> Self {
        match reason {
            MalformedReason::TokenCount { found } => ViolationKind::Structural { token_count: found },
            MalformedReason::TimestampLength { found } => {
                ViolationKind::TimestampFormat { length: found }
            }
        }
    }
}

/// A violation at a 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub line: usize,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Structural { token_count } => write!(
                f,
                "line {}: malformed record ({} tokens)",
                self.line, token_count
            ),
            ViolationKind::TimestampFormat { length } => write!(
                f,
                "line {}: incorrect timestamp format ({} characters)",
                self.line, length
            ),
            ViolationKind::DigestMismatch { timestamp, .. } => write!(
                f,
                "line {}: line at {} doesn't provide good digest",
                self.line, timestamp
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Ok,
    Corrupted,
}

/// Outcome of one verification pass over one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub source: String,
    /// Lines read, malformed ones included
    pub lines: usize,
    /// Links whose digest was recomputed and matched
    pub verified: usize,
    pub violations: Vec<Violation>,
}

impl Verdict {
    pub fn status(&self) -> VerdictStatus {
        if self.violations.is_empty() {
            VerdictStatus::Ok
        } else {
            VerdictStatus::Corrupted
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status() == VerdictStatus::Ok
    }

    pub fn summary(&self) -> String {
        match self.status() {
            VerdictStatus::Ok => format!(
                "{}: ok ({} lines, {} links verified)",
                self.source, self.lines, self.verified
            ),
            VerdictStatus::Corrupted => format!(
                "{}: corrupted ({} lines, {} violations)",
                self.source,
                self.lines,
                self.violations.len()
            ),
        }
    }
}

/// Stateless verifier; all chain state lives inside one `verify` call
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainVerifier {
    policy: MalformedLinePolicy,
}

impl ChainVerifier {
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MalformedLinePolicy {
        self.policy
    }

    /// Verify every link of the chain read from `reader`.
    ///
    /// The caller owns the reader. Read failures are returned as
    /// `io::Error`; they are not corruption.
    pub fn verify<R: BufRead>(&self, source: &str, mut reader: R) -> io::Result<Verdict> {
        info!("opened log file: {}", source);

        let mut verdict = Verdict {
            source: source.to_string(),
            lines: 0,
            verified: 0,
            violations: Vec::new(),
        };
        let mut prev_raw: Option<Vec<u8>> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            verdict.lines += 1;
            let line_no = verdict.lines;
            let raw = strip_terminator(&buf);

            let well_formed = match tokenize(raw) {
                ParsedLine::Malformed(reason) => {
                    match reason {
                        MalformedReason::TokenCount { .. } => error!(
                            "failed to read line {} of {}: {}",
                            line_no,
                            source,
                            raw.escape_ascii()
                        ),
                        MalformedReason::TimestampLength { .. } => error!(
                            "incorrect timestamp format at line {} of {}: {}",
                            line_no,
                            source,
                            raw.escape_ascii()
                        ),
                    }
                    verdict.violations.push(Violation {
                        line: line_no,
                        kind: reason.into(),
                    });
                    false
                }
                ParsedLine::Record(record) => {
                    if let Some(prev) = prev_raw.as_deref() {
                        let expected = digest_hex(prev);
                        if digest_matches(&expected, record.digest) {
                            debug!("line at {} verified", record.timestamp_str());
                            verdict.verified += 1;
                        } else {
                            error!(
                                "line at {} doesn't provide good digest (line {} of {})",
                                record.timestamp_str(),
                                line_no,
                                source
                            );
                            verdict.violations.push(Violation {
                                line: line_no,
                                kind: ViolationKind::DigestMismatch {
                                    timestamp: record.timestamp_str().into_owned(),
                                    expected,
                                    found: record.digest_str().into_owned(),
                                },
                            });
                        }
                    }
                    true
                }
            };

            prev_raw = if well_formed || self.policy == MalformedLinePolicy::CarryForward {
                Some(raw.to_vec())
            } else {
                None
            };
        }

        match verdict.status() {
            VerdictStatus::Ok => info!("log file is ok: {}", source),
            VerdictStatus::Corrupted => error!(
                "log file is corrupted: {} ({} violations)",
                source,
                verdict.violations.len()
            ),
        }

        Ok(verdict)
    }
}
