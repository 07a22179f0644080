pub mod browse;
pub mod error;
pub mod logging;
pub mod membership;
pub mod recommendations;
pub mod search;
pub mod shelf;
pub mod store;

#[cfg(test)]
mod testing;

pub use browse::{
    available_genres, filter_by_genre, recent_releases, sort_movies, trending, trending_score,
    SortKey,
};
pub use error::{RecommendationError, StorageError};
pub use logging::init_logging;
pub use membership::ListMembership;
pub use recommendations::{GenreHistogram, RecommendationEngine};
pub use search::{SearchDebouncer, SearchOutcome};
pub use shelf::MovieShelf;
pub use store::CollectionStore;
