use movieshelf_models::{MovieId, NormalizeError};
use thiserror::Error;

/// Failures surfaced by the catalog client. Nothing here is retried internally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Network error, non-success status or an unreadable body
    #[error("catalog fetch failed: {0}")]
    FetchFailed(String),

    /// Single-movie lookup answered with a non-success status
    #[error("movie {0} not found in catalog")]
    NotFound(MovieId),

    /// Single-movie lookup returned a record that can't be normalized
    #[error("catalog returned an unusable movie record: {0}")]
    Malformed(#[from] NormalizeError),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::FetchFailed(e.to_string())
    }
}
