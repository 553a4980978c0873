//! Hash Chain Verification
//!
//! Each record of a workload log commits to the exact bytes of the record
//! written before it. This module tokenizes records and walks the chain,
//! recomputing every link.

pub mod digest;
pub mod record;
pub mod verify;

pub use digest::{digest_hex, digest_matches, GENESIS_DIGEST};
pub use record::{tokenize, MalformedReason, ParsedLine, Record};
pub use verify::{ChainVerifier, MalformedLinePolicy, Verdict, VerdictStatus, Violation, ViolationKind};
