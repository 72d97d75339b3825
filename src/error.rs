use std::io;

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that stop the application itself.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("could not set up the question provider: {0}")]
    Provider(#[from] ProviderError),
}
