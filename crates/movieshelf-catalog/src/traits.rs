use async_trait::async_trait;
use movieshelf_models::{Movie, MovieId};

use crate::error::CatalogError;

/// Genre value meaning "no genre filter"
pub const ALL_GENRES: &str = "All";

/// Read access to the remote movie catalog.
///
/// Results are already normalized; records that could not be normalized are
/// dropped by the implementation.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Random subset of the catalog
    async fn fetch_random(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Movies tagged with `genre`. `"All"` or an empty string means unfiltered.
    async fn fetch_by_genre(&self, genre: &str) -> Result<Vec<Movie>, CatalogError>;

    /// Movies matching any of `genres`. An empty slice is the same as `fetch_all`.
    async fn fetch_by_genres(&self, genres: &[String]) -> Result<Vec<Movie>, CatalogError>;

    async fn fetch_by_id(&self, id: MovieId) -> Result<Movie, CatalogError>;

    /// Free-text search. Debouncing and minimum query length are the caller's job.
    async fn search(&self, query: &str) -> Result<Vec<Movie>, CatalogError>;
}

/// True for the genre values that disable genre filtering
pub fn is_unfiltered_genre(genre: &str) -> bool {
    let genre = genre.trim();
    genre.is_empty() || genre.eq_ignore_ascii_case(ALL_GENRES)
}
