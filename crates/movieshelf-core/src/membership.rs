use movieshelf_models::{Collection, Movie, MovieId};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::store::CollectionStore;

/// Membership queries and mutations over the persisted collections.
///
/// This is the only writer of the collections. Every mutation is a whole
/// collection read-modify-write performed under that collection's lock, which
/// keeps `id`s unique and prevents lost updates when callers race.
pub struct ListMembership {
    store: CollectionStore,
    watchlist_lock: Mutex<()>,
    favorites_lock: Mutex<()>,
}

impl ListMembership {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            watchlist_lock: Mutex::new(()),
            favorites_lock: Mutex::new(()),
        }
    }

    fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        let lock = match collection {
            Collection::Watchlist => &self.watchlist_lock,
            Collection::Favorites => &self.favorites_lock,
        };
        // The guarded data lives on disk, so a poisoned lock carries no broken state
        lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, collection: Collection, movie_id: MovieId) -> bool {
        self.store.load(collection).iter().any(|m| m.id == movie_id)
    }

    /// Current contents in insertion order
    pub fn list(&self, collection: Collection) -> Vec<Movie> {
        self.store.load(collection)
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.store.load(collection).len()
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    /// Remove the movie if present, append it otherwise.
    /// Returns the membership state after the call.
    pub fn toggle(&self, collection: Collection, movie: &Movie) -> Result<bool, StorageError> {
        let _guard = self.lock(collection);
        let mut movies = self.store.load(collection);

        let now_member = if movies.iter().any(|m| m.id == movie.id) {
            movies.retain(|m| m.id != movie.id);
            false
        } else {
            movies.push(movie.clone());
            true
        };

        self.store.save(collection, &movies)?;
        debug!(
            "Toggled movie {} in {}: member={} (size={})",
            movie.id,
            collection,
            now_member,
            movies.len()
        );
        Ok(now_member)
    }

    /// Append the movie unless it is already present. Returns true when added.
    pub fn add(&self, collection: Collection, movie: &Movie) -> Result<bool, StorageError> {
        let _guard = self.lock(collection);
        let mut movies = self.store.load(collection);
        if movies.iter().any(|m| m.id == movie.id) {
            return Ok(false);
        }
        movies.push(movie.clone());
        self.store.save(collection, &movies)?;
        Ok(true)
    }

    /// Remove the movie if present. Returns true when something was removed.
    pub fn remove(&self, collection: Collection, movie_id: MovieId) -> Result<bool, StorageError> {
        let _guard = self.lock(collection);
        let mut movies = self.store.load(collection);
        let before = movies.len();
        movies.retain(|m| m.id != movie_id);
        if movies.len() == before {
            return Ok(false);
        }
        self.store.save(collection, &movies)?;
        Ok(true)
    }

    /// Take the movie out of `from` and append it to `to`, never duplicating it in `to`.
    pub fn move_movie(
        &self,
        movie: &Movie,
        from: Collection,
        to: Collection,
    ) -> Result<(), StorageError> {
        if from == to {
            return Ok(());
        }

        // Fixed lock order across both collections
        let (_first, _second) = match from {
            Collection::Watchlist => (self.lock(from), self.lock(to)),
            Collection::Favorites => {
                let first = self.lock(to);
                (first, self.lock(from))
            }
        };

        let mut source = self.store.load(from);
        let before = source.len();
        source.retain(|m| m.id != movie.id);
        if source.len() != before {
            self.store.save(from, &source)?;
        }

        let mut target = self.store.load(to);
        if !target.iter().any(|m| m.id == movie.id) {
            target.push(movie.clone());
            self.store.save(to, &target)?;
        }

        debug!("Moved movie {} from {} to {}", movie.id, from, to);
        Ok(())
    }

    /// Clear both collections. Both are attempted even if the first fails.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for collection in Collection::ALL {
            let _guard = self.lock(collection);
            if let Err(e) = self.store.clear(collection) {
                first_error.get_or_insert(e);
            }
        }
        info!("Cleared watchlist and favorites");
        first_error.map_or(Ok(()), Err)
    }
}
