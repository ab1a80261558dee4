use debrief_export::error::ExportError;
use debrief_gemini::error::GeminiError;
use debrief_mail::error::MailError;
use debrief_storage::error::StorageError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Model(#[from] GeminiError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("model reply produced an empty narrative")]
    EmptyNarrative,

    #[error("storage task failed: {0}")]
    StorageTask(String),

    #[error("sweep aborted at row {row}: {source}")]
    SweepAborted {
        row: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

/// Coarse classification used in logs, API responses and sweep reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing credential, table or column. Needs an operator.
    Configuration,
    /// The model API failed or could not be reached.
    RemoteService,
    /// The model answered but broke the JSON contract.
    ResponseFormat,
    Storage,
    Notification,
    Template,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Storage(e) if e.is_configuration() => ErrorKind::Configuration,
            PipelineError::Storage(_) => ErrorKind::Storage,
            PipelineError::Model(e) if e.is_configuration() => ErrorKind::Configuration,
            PipelineError::Model(e) if e.is_remote() => ErrorKind::RemoteService,
            PipelineError::Model(_) => ErrorKind::ResponseFormat,
            PipelineError::EmptyNarrative => ErrorKind::ResponseFormat,
            PipelineError::StorageTask(_) => ErrorKind::Storage,
            PipelineError::Export(_) => ErrorKind::Template,
            PipelineError::Mail(_) => ErrorKind::Notification,
            PipelineError::SweepAborted { source, .. } => source.kind(),
        }
    }
}
