use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),

    #[error("failed to write outbox message {path}: {source}")]
    Outbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mail relay returned {status}: {body}")]
    Relay { status: u16, body: String },

    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for MailError {
    fn from(e: reqwest::Error) -> Self {
        MailError::Transport(e.to_string())
    }
}
