// In-memory catalog used by the unit tests of this crate.

use async_trait::async_trait;
use movieshelf_catalog::{is_unfiltered_genre, CatalogError, MovieCatalog};
use movieshelf_models::{Movie, MovieId};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeCatalog {
    pub all: Vec<Movie>,
    pub by_genre: HashMap<String, Result<Vec<Movie>, CatalogError>>,
    pub search_delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(mut self, genre: &str, movies: Vec<Movie>) -> Self {
        self.by_genre.insert(genre.to_string(), Ok(movies));
        self
    }

    pub fn with_failing_genre(mut self, genre: &str) -> Self {
        self.by_genre.insert(
            genre.to_string(),
            Err(CatalogError::FetchFailed(format!("{} is down", genre))),
        );
        self
    }

    pub fn with_all(mut self, movies: Vec<Movie>) -> Self {
        self.all = movies;
        self
    }

    /// Simulate a slow search endpoint
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// Every request made so far, as "<operation>:<argument>"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn fetch_all(&self) -> Result<Vec<Movie>, CatalogError> {
        self.record("all:".to_string());
        Ok(self.all.clone())
    }

    async fn fetch_random(&self) -> Result<Vec<Movie>, CatalogError> {
        self.record("random:".to_string());
        Ok(self.all.clone())
    }

    async fn fetch_by_genre(&self, genre: &str) -> Result<Vec<Movie>, CatalogError> {
        self.record(format!("genre:{}", genre));
        if is_unfiltered_genre(genre) {
            return Ok(self.all.clone());
        }
        self.by_genre.get(genre).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_by_genres(&self, genres: &[String]) -> Result<Vec<Movie>, CatalogError> {
        self.record(format!("genres:{}", genres.join(",")));
        Ok(self
            .all
            .iter()
            .filter(|m| genres.iter().any(|g| m.has_genre(g)))
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: MovieId) -> Result<Movie, CatalogError> {
        self.record(format!("id:{}", id));
        self.all
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        self.record(format!("search:{}", query));
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        let needle = query.to_lowercase();
        Ok(self
            .all
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
