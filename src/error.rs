use thiserror::Error;

/// Failures of the search provider call.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("search provider error: {0}")]
    Provider(String),
}

/// Failures of the language-model completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response had no content")]
    EmptyCompletion,
    #[error("completion provider error: {0}")]
    Provider(String),
}

/// Classified errors surfaced by the answer pipeline.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Question cannot be empty.")]
    EmptyQuestion,
    #[error("Search service is unavailable. Please try again later.")]
    SearchUnavailable(#[source] SearchError),
    #[error("Answer generation failed: {0}")]
    AnswerGeneration(#[source] LlmError),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<SearchError> for PipelineError {
    fn from(err: SearchError) -> Self {
        PipelineError::SearchUnavailable(err)
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        PipelineError::AnswerGeneration(err)
    }
}
