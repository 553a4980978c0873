pub mod chain;
pub mod config;
pub mod error;
pub mod session;

pub use chain::{ChainVerifier, MalformedLinePolicy, Verdict, VerdictStatus};
pub use error::LogChainError;
pub use session::{ExitStatus, SessionConfig, SessionReport, SessionRunner};
