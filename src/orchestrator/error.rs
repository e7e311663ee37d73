use thiserror::Error;

use crate::error::AppError;

/// Failures of a single user action.
///
/// `Display` is the notification shown to the user; the store error behind it
/// is kept as the source for logging.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Sign in to save or delete summaries")]
    AuthRequired,

    #[error("Failed to save the blog content. Nothing was stored.")]
    PrimaryWrite(#[source] AppError),

    #[error("Saved to the document store but failed to save the summary to the record store")]
    SecondaryWrite(#[source] AppError),

    #[error("Failed to load saved summaries")]
    Read(#[source] AppError),

    #[error("Failed to delete")]
    Delete(#[source] AppError),

    #[error("{0}")]
    NotFound(String),
}
