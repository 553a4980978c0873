//! Verification Sessions
//!
//! A session repeatedly verifies a fixed set of log sources for a bounded
//! wall-clock duration and reports the worst outcome it saw.

pub mod runner;
pub mod source;

pub use runner::{
    ExitStatus, SessionConfig, SessionReport, SessionRunner, SourceOutcome,
    DEFAULT_DURATION_MINUTES, DEFAULT_PASS_INTERVAL, MIN_PASS_INTERVAL,
};
pub use source::{FileSource, LogSource, STDIN_SOURCE};
