use movieshelf_catalog::{CatalogError, MovieCatalog};
use movieshelf_config::SearchConfig;
use movieshelf_models::Movie;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// What became of one search request
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The latest query's results
    Results { seq: u64, movies: Vec<Movie> },
    /// Below the minimum length; nothing was sent
    TooShort { seq: u64 },
    /// A newer query was issued before this one could complete
    Superseded { seq: u64 },
}

impl SearchOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            SearchOutcome::Results { seq, .. }
            | SearchOutcome::TooShort { seq }
            | SearchOutcome::Superseded { seq } => *seq,
        }
    }

    pub fn into_movies(self) -> Option<Vec<Movie>> {
        match self {
            SearchOutcome::Results { movies, .. } => Some(movies),
            _ => None,
        }
    }
}

/// Debounced front door to [`MovieCatalog::search`].
///
/// Each call takes the next sequence number. A call waits out the debounce
/// window and gives up as soon as a newer call is issued; a response that
/// arrives after a newer call was issued is reported as superseded.
pub struct SearchDebouncer {
    catalog: Arc<dyn MovieCatalog>,
    delay: Duration,
    min_query_len: usize,
    latest: watch::Sender<u64>,
}

impl SearchDebouncer {
    pub fn new(catalog: Arc<dyn MovieCatalog>, config: &SearchConfig) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            catalog,
            delay: config.debounce(),
            min_query_len: config.min_query_len,
            latest,
        }
    }

    /// Sequence number of the most recently issued query
    pub fn latest_seq(&self) -> u64 {
        *self.latest.borrow()
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest_seq() == seq
    }

    fn issue(&self) -> (u64, watch::Receiver<u64>) {
        let mut seq = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            seq = *latest;
        });
        (seq, self.latest.subscribe())
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, CatalogError> {
        let (seq, mut newer) = self.issue();
        let query = query.trim();

        if query.chars().count() < self.min_query_len {
            debug!("Search #{} too short: {:?}", seq, query);
            return Ok(SearchOutcome::TooShort { seq });
        }

        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = newer.changed() => {
                debug!("Search #{} cancelled during debounce", seq);
                return Ok(SearchOutcome::Superseded { seq });
            }
        }
        // A newer call may have landed between issuing and subscribing
        if !self.is_latest(seq) {
            return Ok(SearchOutcome::Superseded { seq });
        }

        debug!("Search #{} sending {:?}", seq, query);
        let result = self.catalog.search(query).await;

        if !self.is_latest(seq) {
            debug!("Search #{} response discarded, latest is #{}", seq, self.latest_seq());
            return Ok(SearchOutcome::Superseded { seq });
        }
        result.map(|movies| SearchOutcome::Results { seq, movies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use tokio::time::sleep;

    fn catalog() -> FakeCatalog {
        FakeCatalog::new().with_all(vec![
            Movie::new(1, "Star Wars"),
            Movie::new(2, "Stardust"),
            Movie::new(3, "Heat"),
        ])
    }

    fn debouncer(catalog: &Arc<FakeCatalog>) -> SearchDebouncer {
        SearchDebouncer::new(catalog.clone(), &SearchConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_query_fires_after_window() {
        let catalog = Arc::new(catalog());
        let search = debouncer(&catalog);

        let started = tokio::time::Instant::now();
        let outcome = search.search("star").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(outcome.seq(), 1);
        assert_eq!(outcome.into_movies().unwrap().len(), 2);
        assert_eq!(catalog.calls(), vec!["search:star"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_sends_only_last_query() {
        let catalog = Arc::new(catalog());
        let search = debouncer(&catalog);

        let first = search.search("sta");
        let second = async {
            sleep(Duration::from_millis(100)).await;
            search.search("star").await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), SearchOutcome::Superseded { seq: 1 });
        assert!(matches!(second.unwrap(), SearchOutcome::Results { seq: 2, .. }));
        assert_eq!(catalog.calls(), vec!["search:star"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_queries_each_fire() {
        let catalog = Arc::new(catalog());
        let search = debouncer(&catalog);

        search.search("star").await.unwrap();
        sleep(Duration::from_millis(500)).await;
        search.search("heat").await.unwrap();

        assert_eq!(catalog.calls(), vec!["search:star", "search:heat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_sent() {
        let catalog = Arc::new(catalog());
        let search = debouncer(&catalog);

        assert_eq!(search.search("s").await.unwrap(), SearchOutcome::TooShort { seq: 1 });
        assert_eq!(search.search("  h ").await.unwrap(), SearchOutcome::TooShort { seq: 2 });
        assert_eq!(search.search("").await.unwrap(), SearchOutcome::TooShort { seq: 3 });
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_cancels_pending_search() {
        let catalog = Arc::new(catalog());
        let search = debouncer(&catalog);

        let pending = search.search("star");
        let cleared = async {
            sleep(Duration::from_millis(100)).await;
            search.search("s").await
        };
        let (pending, cleared) = tokio::join!(pending, cleared);

        assert_eq!(pending.unwrap(), SearchOutcome::Superseded { seq: 1 });
        assert_eq!(cleared.unwrap(), SearchOutcome::TooShort { seq: 2 });
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let catalog = Arc::new(catalog().with_search_delay(Duration::from_millis(500)));
        let search = debouncer(&catalog);

        // First request is in flight (300ms..800ms) when the second is issued at 400ms
        let slow = search.search("star");
        let fresh = async {
            sleep(Duration::from_millis(400)).await;
            search.search("stard").await
        };
        let (slow, fresh) = tokio::join!(slow, fresh);

        assert_eq!(slow.unwrap(), SearchOutcome::Superseded { seq: 1 });
        let movies = fresh.unwrap().into_movies().unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Stardust");
        assert_eq!(catalog.calls(), vec!["search:star", "search:stard"]);
        assert_eq!(search.latest_seq(), 2);
    }
}
