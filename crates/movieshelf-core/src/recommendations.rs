// Genre-based recommendations derived from the user's saved movies

use futures::future::try_join_all;
use movieshelf_catalog::MovieCatalog;
use movieshelf_config::RecommendationConfig;
use movieshelf_models::{rating_desc, Collection, Movie, MovieId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::RecommendationError;
use crate::store::CollectionStore;

pub const DEFAULT_TOP_GENRES: usize = 5;
pub const DEFAULT_LIMIT: usize = 20;

/// Genre occurrence counts, kept in first-encountered order.
///
/// The ordering matters: ties in [`GenreHistogram::top`] are broken by which
/// genre was seen first, never alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreHistogram {
    counts: Vec<(String, usize)>,
}

impl GenreHistogram {
    pub fn from_movies<'a, I>(movies: I) -> Self
    where
        I: IntoIterator<Item = &'a Movie>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for genre in movies.into_iter().flat_map(|m| m.genres.iter()) {
            match index.get(genre) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(genre.clone(), counts.len());
                    counts.push((genre.clone(), 1));
                }
            }
        }

        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, genre: &str) -> usize {
        self.counts
            .iter()
            .find(|(g, _)| g == genre)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Entries in first-encountered order
    pub fn entries(&self) -> &[(String, usize)] {
        &self.counts
    }

    /// The `n` most frequent genres, highest count first
    pub fn top(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<&(String, usize)> = self.counts.iter().collect();
        // sort_by is stable, so equal counts keep first-encountered order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(g, _)| g.clone()).collect()
    }
}

/// Concatenate per-genre batches and drop repeated ids, keeping the first occurrence
pub fn merge_candidates(batches: Vec<Vec<Movie>>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|movie| seen.insert(movie.id))
        .collect()
}

/// Drop every candidate the user already saved
pub fn exclude_saved(candidates: Vec<Movie>, saved: &HashSet<MovieId>) -> Vec<Movie> {
    candidates
        .into_iter()
        .filter(|movie| !saved.contains(&movie.id))
        .collect()
}

/// Stable descending-rating sort, unranked last, then truncate
pub fn rank_candidates(mut candidates: Vec<Movie>, limit: usize) -> Vec<Movie> {
    candidates.sort_by(rating_desc);
    candidates.truncate(limit);
    candidates
}

/// Derives recommendations from the genres of the user's watchlist and favorites
pub struct RecommendationEngine {
    catalog: Arc<dyn MovieCatalog>,
    store: CollectionStore,
    top_genres: usize,
    limit: usize,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn MovieCatalog>, store: CollectionStore) -> Self {
        Self {
            catalog,
            store,
            top_genres: DEFAULT_TOP_GENRES,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_config(
        catalog: Arc<dyn MovieCatalog>,
        store: CollectionStore,
        config: &RecommendationConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            top_genres: config.top_genres,
            limit: config.limit,
        }
    }

    /// Histogram over watchlist followed by favorites
    pub fn genre_histogram(&self) -> GenreHistogram {
        let watchlist = self.store.load(Collection::Watchlist);
        let favorites = self.store.load(Collection::Favorites);
        GenreHistogram::from_movies(watchlist.iter().chain(favorites.iter()))
    }

    /// Compute the recommendation list.
    ///
    /// Returns an empty list without touching the network when nothing is saved
    /// (or nothing saved has genres). Fails as a whole if any genre fetch fails.
    pub async fn recommend(&self) -> Result<Vec<Movie>, RecommendationError> {
        let watchlist = self.store.load(Collection::Watchlist);
        let favorites = self.store.load(Collection::Favorites);

        let histogram = GenreHistogram::from_movies(watchlist.iter().chain(favorites.iter()));
        if histogram.is_empty() {
            debug!("No saved genres, skipping recommendations");
            return Ok(Vec::new());
        }

        let genres = histogram.top(self.top_genres);
        debug!(
            "Recommendation seed genres: {:?} (of {} saved genres)",
            genres,
            histogram.len()
        );

        let fetches = genres.iter().map(|genre| async move {
            self.catalog
                .fetch_by_genre(genre)
                .await
                .map_err(|source| RecommendationError::Unavailable {
                    genre: genre.clone(),
                    source,
                })
        });
        let batches = try_join_all(fetches).await.map_err(|e| {
            warn!("{}", e);
            e
        })?;

        let fetched: usize = batches.iter().map(Vec::len).sum();
        let candidates = merge_candidates(batches);
        let unique = candidates.len();

        let saved: HashSet<MovieId> = watchlist
            .iter()
            .chain(favorites.iter())
            .map(|m| m.id)
            .collect();
        let candidates = exclude_saved(candidates, &saved);
        let unsaved = candidates.len();

        let recommendations = rank_candidates(candidates, self.limit);
        info!(
            "Recommendations: fetched={}, unique={}, unsaved={}, returned={}",
            fetched,
            unique,
            unsaved,
            recommendations.len()
        );

        Ok(recommendations)
    }
}
