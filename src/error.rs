use thiserror::Error;

use crate::api::ApiError;
use crate::controller::{Section, SubmitError};

#[derive(Debug, Error)]
pub enum BriefError {
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// The job ended in the error section; the message was already shown.
    #[error("Brief generation did not complete (ended in {0})")]
    Unfinished(Section),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BriefError {
    /// Process exit code: 2 for input the form refused, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            BriefError::Submit(SubmitError::Invalid(_)) => 2,
            _ => 1,
        }
    }
}
