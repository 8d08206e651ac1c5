use thiserror::Error;

/// Errors returned by the QnA Maker client.
#[derive(Error, Debug)]
pub enum QnAMakerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("QnA Maker API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Question is empty")]
    EmptyQuestion,
}
