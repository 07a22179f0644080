use async_trait::async_trait;
use movieshelf_config::CatalogConfig;
use movieshelf_models::{is_adult, normalize_record, Movie, MovieId};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::rest::api;
use crate::traits::{is_unfiltered_genre, MovieCatalog};

/// HTTP client for the remote movie catalog.
///
/// Every batch endpoint is normalized record-by-record: malformed records are
/// logged and skipped, adult records are dropped unless `include_adult` is set.
#[derive(Clone)]
pub struct CatalogClient {
    client: Arc<Client>,
    base_url: String,
    include_adult: bool,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::from_config(&CatalogConfig {
            base_url: base_url.into(),
            ..CatalogConfig::default()
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CatalogError::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim().to_string(),
            include_adult: config.include_adult,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn normalize_batch(&self, records: Vec<Value>) -> Vec<Movie> {
        let total = records.len();
        let mut movies = Vec::with_capacity(total);
        let mut skipped_malformed = 0;
        let mut skipped_adult = 0;

        for record in &records {
            if !self.include_adult && is_adult(record) {
                skipped_adult += 1;
                continue;
            }
            match normalize_record(record) {
                Ok(movie) => movies.push(movie),
                Err(e) => {
                    skipped_malformed += 1;
                    warn!("Skipping catalog record: {}", e);
                }
            }
        }

        debug!(
            "Normalized catalog batch: total={}, kept={}, skipped_malformed={}, skipped_adult={}",
            total,
            movies.len(),
            skipped_malformed,
            skipped_adult
        );

        movies
    }
}

#[async_trait]
impl MovieCatalog for CatalogClient {
    async fn fetch_all(&self) -> Result<Vec<Movie>, CatalogError> {
        let records = api::get_movies(&self.client, &self.base_url).await?;
        Ok(self.normalize_batch(records))
    }

    async fn fetch_random(&self) -> Result<Vec<Movie>, CatalogError> {
        let records = api::get_random_movies(&self.client, &self.base_url).await?;
        Ok(self.normalize_batch(records))
    }

    async fn fetch_by_genre(&self, genre: &str) -> Result<Vec<Movie>, CatalogError> {
        if is_unfiltered_genre(genre) {
            return self.fetch_all().await;
        }
        let records = api::get_movies_by_genre(&self.client, &self.base_url, genre.trim()).await?;
        Ok(self.normalize_batch(records))
    }

    async fn fetch_by_genres(&self, genres: &[String]) -> Result<Vec<Movie>, CatalogError> {
        let selected: Vec<&str> = genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect();
        if selected.is_empty() {
            return self.fetch_all().await;
        }
        let records = api::get_movies_by_genres(&self.client, &self.base_url, &selected).await?;
        Ok(self.normalize_batch(records))
    }

    async fn fetch_by_id(&self, id: MovieId) -> Result<Movie, CatalogError> {
        let record = api::get_movie(&self.client, &self.base_url, id).await?;
        Ok(normalize_record(&record)?)
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let records = api::search_movies(&self.client, &self.base_url, query.trim()).await?;
        Ok(self.normalize_batch(records))
    }
}
