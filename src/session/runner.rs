//! Session Runner
//!
//! Re-verifies a fixed set of log sources pass after pass until the
//! duration budget is spent, then reduces every outcome to one exit status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::chain::{ChainVerifier, MalformedLinePolicy, Verdict};
use crate::error::{LogChainError, Result};
use crate::session::source::LogSource;

/// Default pause between passes
pub const DEFAULT_PASS_INTERVAL: Duration = Duration::from_millis(1000);

/// Shortest pause allowed between passes; anything lower would spin
pub const MIN_PASS_INTERVAL: Duration = Duration::from_millis(10);

/// Default session length in minutes
pub const DEFAULT_DURATION_MINUTES: i64 = 5;

/// Process exit status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Success,
    Failure,
    InvalidArguments,
}

impl ExitStatus {
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::InvalidArguments => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Session settings, passed in explicitly
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub sources: Vec<String>,
    pub duration_minutes: i64,
    pub pass_interval: Duration,
    pub policy: MalformedLinePolicy,
    budget_override: Option<Duration>,
}

impl SessionConfig {
    pub fn new(sources: Vec<String>, duration_minutes: i64) -> Self {
        Self {
            sources,
            duration_minutes,
            pass_interval: DEFAULT_PASS_INTERVAL,
            policy: MalformedLinePolicy::default(),
            budget_override: None,
        }
    }

    pub fn with_pass_interval(mut self, pass_interval: Duration) -> Self {
        self.pass_interval = pass_interval;
        self
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use an exact budget instead of whole minutes
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget_override = Some(budget);
        self
    }

    /// Reject settings that make no sense before any source is touched
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes < 0 {
            return Err(LogChainError::InvalidDuration(self.duration_minutes));
        }
        if self.sources.is_empty() {
            return Err(LogChainError::no_sources());
        }
        Ok(())
    }

    pub fn budget(&self) -> Duration {
        match self.budget_override {
            Some(budget) => budget,
            None => Duration::from_secs((self.duration_minutes.max(0) as u64).saturating_mul(60)),
        }
    }

    /// Pass interval with the minimum applied
    pub fn effective_pass_interval(&self) -> Duration {
        if self.pass_interval < MIN_PASS_INTERVAL {
            warn!(
                "Pass interval of {:?} would busy-loop, using {:?}",
                self.pass_interval, MIN_PASS_INTERVAL
            );
            MIN_PASS_INTERVAL
        } else {
            self.pass_interval
        }
    }
}

/// Result of handling one source in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    Verified(Verdict),
    IoError { source: String, message: String },
}

impl SourceOutcome {
    pub fn source(&self) -> &str {
        match self {
            SourceOutcome::Verified(verdict) => &verdict.source,
            SourceOutcome::IoError { source, .. } => source,
        }
    }

    pub fn is_failure(&self) -> bool {
        match self {
            SourceOutcome::Verified(verdict) => !verdict.is_ok(),
            SourceOutcome::IoError { .. } => true,
        }
    }
}

/// Aggregated outcome of a whole session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub passes: usize,
    /// Failed source outcomes summed over every pass
    pub failures: usize,
    /// Outcomes of the final pass, one per source in configured order
    pub last_pass: Vec<SourceOutcome>,
}

impl SessionReport {
    pub fn failed(&self) -> bool {
        self.failures > 0
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.failed() {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives verification passes over the configured sources
pub struct SessionRunner<S: LogSource> {
    config: SessionConfig,
    source: S,
    verifier: ChainVerifier,
}

impl<S: LogSource> SessionRunner<S> {
    /// Create a runner; invalid settings are rejected here, before any I/O
    pub fn new(config: SessionConfig, source: S) -> Result<Self> {
        config.validate()?;
        let verifier = ChainVerifier::new(config.policy);
        Ok(Self {
            config,
            source,
            verifier,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run passes until the budget is spent. The first pass always runs;
    /// a later pass runs only if it would start inside the budget, and the
    /// budget never interrupts a pass in progress.
    pub fn run(&self) -> SessionReport {
        let budget = self.config.budget();
        let interval = self.config.effective_pass_interval();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut passes = 0;
        let mut failures = 0;

        let last_pass = loop {
            info!("Run number: {}", passes);
            let outcomes = self.run_pass();
            failures += outcomes.iter().filter(|outcome| outcome.is_failure()).count();
            passes += 1;

            let elapsed = start.elapsed();
            info!("Time passed {:.4} minutes", elapsed.as_secs_f64() / 60.0);

            // The next pass would start after the budget
            if budget.saturating_sub(elapsed) <= interval {
                info!("Done reading!");
                break outcomes;
            }
            thread::sleep(interval);
        };

        let report = SessionReport {
            started_at,
            finished_at: Utc::now(),
            passes,
            failures,
            last_pass,
        };
        info!(
            "Verification session complete: {} passes, {} failed outcomes",
            report.passes, report.failures
        );
        report
    }

    /// One pass over every source, in order
    pub fn run_pass(&self) -> Vec<SourceOutcome> {
        self.config
            .sources
            .iter()
            .map(|name| self.check_source(name))
            .collect()
    }

    fn check_source(&self, name: &str) -> SourceOutcome {
        let reader = match self.source.open(name) {
            Ok(reader) => reader,
            Err(e) => {
                error!("Failed to open log file {}: {}", name, e);
                return SourceOutcome::IoError {
                    source: name.to_string(),
                    message: e.to_string(),
                };
            }
        };

        match self.verifier.verify(name, reader) {
            Ok(verdict) => SourceOutcome::Verified(verdict),
            Err(e) => {
                error!("Failed to read log file {}: {}", name, e);
                SourceOutcome::IoError {
                    source: name.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }
}
