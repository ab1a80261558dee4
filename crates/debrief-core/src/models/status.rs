use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const ERROR_PREFIX: &str = "ERROR: ";

/// Value of the `feedbackEmailStatus` column once a row has been touched.
///
/// An empty cell means the row has never been processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// Narrative written, nobody to email.
    Ready,
    /// Narrative written and emailed.
    Sent,
    /// Processing failed; the message is shown to whoever reads the sheet.
    Error(String),
}

impl FeedbackStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Parse a status cell. Blank cells yield `None`.
    pub fn from_cell(cell: &str) -> Result<Option<Self>, CoreError> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackStatus::Ready => f.write_str("READY"),
            FeedbackStatus::Sent => f.write_str("SENT"),
            FeedbackStatus::Error(msg) => write!(f, "{ERROR_PREFIX}{msg}"),
        }
    }
}

impl FromStr for FeedbackStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(Self::Ready),
            "SENT" => Ok(Self::Sent),
            other => other
                .strip_prefix(ERROR_PREFIX)
                .map(|msg| Self::Error(msg.to_string()))
                .ok_or_else(|| CoreError::InvalidStatus(other.to_string())),
        }
    }
}
