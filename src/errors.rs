// errors.rs
use crate::domain::NormalizeError;
use thiserror::Error;

/// Errors that end a run early. Everything else (fetch failures, store I/O,
/// mail delivery) is absorbed by its stage and shows up in the report or log.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to clean the data: {0}")]
    Normalize(#[from] NormalizeError),
}
