use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unrecognised feedback status: {0}")]
    InvalidStatus(String),
}
