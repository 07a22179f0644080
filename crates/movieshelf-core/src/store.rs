use movieshelf_config::{storage_file_in, write_atomic, PathManager};
use movieshelf_models::{Collection, Movie};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StorageError;

/// Durable storage for the watchlist and favorites collections.
///
/// One JSON file per collection key. Each call touches exactly one file and
/// writes go through a temp-file rename, so a crash never leaves a partially
/// written collection behind. Collections are independent: a failed write to
/// one never affects the other.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    data_dir: PathBuf,
}

impl CollectionStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_paths(path_manager: &PathManager) -> Self {
        Self::new(path_manager.data_dir())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        storage_file_in(&self.data_dir, collection.storage_key())
    }

    /// Load a collection. Absent or corrupt data yields an empty collection.
    pub fn load(&self, collection: Collection) -> Vec<Movie> {
        let path = self.collection_path(collection);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Collection miss: {} (file does not exist)", collection);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read collection file for {}: {}", collection, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Movie>>(&content) {
            Ok(movies) => {
                debug!("Collection hit: {} (loaded {} movies)", collection, movies.len());
                movies
            }
            Err(e) => {
                warn!(
                    "Collection corruption detected for {}: {}. Deleting corrupted file.",
                    collection, e
                );
                if let Err(rm_err) = std::fs::remove_file(&path) {
                    warn!("Failed to delete corrupted collection file: {}", rm_err);
                }
                Vec::new()
            }
        }
    }

    /// Replace the stored collection with `movies`
    pub fn save(&self, collection: Collection, movies: &[Movie]) -> Result<(), StorageError> {
        let key = collection.storage_key();
        let json = serde_json::to_vec(movies)
            .map_err(|source| StorageError::Serialize { key, source })?;

        write_atomic(&self.collection_path(collection), &json).map_err(|source| {
            warn!("Failed to write collection file for {}: {}", collection, source);
            StorageError::Io { key, source }
        })?;

        debug!("Collection saved: {} ({} movies)", collection, movies.len());
        Ok(())
    }

    /// Remove the stored collection entirely
    pub fn clear(&self, collection: Collection) -> Result<(), StorageError> {
        let path = self.collection_path(collection);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Cleared collection: {}", collection);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: collection.storage_key(),
                source,
            }),
        }
    }
}
