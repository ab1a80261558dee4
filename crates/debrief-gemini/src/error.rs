use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("missing Gemini API key (set GEMINI_API_KEY)")]
    MissingCredential,

    #[error("model API returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("model API request failed: {0}")]
    Transport(String),

    #[error("model response was not usable: {0}")]
    ResponseFormat(String),

    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),
}

impl GeminiError {
    /// Missing or invalid local configuration; retrying will not help.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GeminiError::MissingCredential | GeminiError::ClientBuild(_))
    }

    /// The remote service failed or could not be reached.
    pub fn is_remote(&self) -> bool {
        matches!(self, GeminiError::Remote { .. } | GeminiError::Transport(_))
    }

    /// The service answered but the answer broke the JSON contract.
    pub fn is_response_format(&self) -> bool {
        matches!(self, GeminiError::ResponseFormat(_))
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        GeminiError::Transport(e.without_url().to_string())
    }
}
