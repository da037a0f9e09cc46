use thiserror::Error;

/// Rejected input, raised before any document is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Question is required")]
    EmptyQuestion,
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No documents are configured or none of them could be reached.
    #[error("{0}")]
    Configuration(String),
    /// Raised only under [`crate::ExtractionPolicy::Abort`].
    #[error("failed to extract {document}: {message}")]
    Extraction { document: String, message: String },
}

impl EngineError {
    /// Short stable name used by transports when reporting the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::Configuration(_) => "configuration",
            EngineError::Extraction { .. } => "extraction",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
