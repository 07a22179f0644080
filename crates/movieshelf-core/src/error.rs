use movieshelf_catalog::CatalogError;
use thiserror::Error;

/// A collection write that did not reach disk.
///
/// Reads never produce this: unreadable or corrupt data is replaced by an
/// empty collection at the store boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {key}: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The recommendation set is withheld as a whole when any genre fetch fails.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("recommendations unavailable: fetching genre `{genre}` failed: {source}")]
    Unavailable {
        genre: String,
        #[source]
        source: CatalogError,
    },
}
