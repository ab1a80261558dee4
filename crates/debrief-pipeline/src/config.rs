use std::str::FromStr;
use std::time::Duration;

use debrief_core::schema::table;
use debrief_gemini::structured::DEFAULT_MAX_ATTEMPTS;
use serde::Serialize;

pub const DEFAULT_SUBJECT_PREFIX: &str = "On-call simulation feedback:";
/// Pause between model calls during a sweep.
pub const DEFAULT_SWEEP_DELAY: Duration = Duration::from_millis(400);

/// Names of the three workbook tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub responses: String,
    pub rubric: String,
    pub cases: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            responses: table::RESPONSES.to_string(),
            rubric: table::RUBRIC.to_string(),
            cases: table::CASES.to_string(),
        }
    }
}

/// What a sweep does when one submission fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepErrorPolicy {
    /// Stop the sweep at the failing row; later rows wait for the next pass.
    #[default]
    Abort,
    /// Mark the row and carry on with the rest.
    Continue,
}

impl FromStr for SweepErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!(
                "unknown sweep error policy {other:?} (expected \"abort\" or \"continue\")"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub tables: TableNames,
    pub email_subject_prefix: String,
    pub email_from: Option<String>,
    pub sweep_delay: Duration,
    pub sweep_error_policy: SweepErrorPolicy,
    /// Model requests per submission, counting repair attempts.
    pub max_model_attempts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tables: TableNames::default(),
            email_subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            email_from: None,
            sweep_delay: DEFAULT_SWEEP_DELAY,
            sweep_error_policy: SweepErrorPolicy::default(),
            max_model_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Abort".parse::<SweepErrorPolicy>(), Ok(SweepErrorPolicy::Abort));
        assert_eq!(" continue ".parse::<SweepErrorPolicy>(), Ok(SweepErrorPolicy::Continue));
        assert!("skip".parse::<SweepErrorPolicy>().is_err());
    }
}
