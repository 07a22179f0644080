use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two user-owned movie lists persisted on the device
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Movies the user wants to watch
    Watchlist,
    /// Movies the user marked as favorite
    Favorites,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Watchlist, Collection::Favorites];

    /// Namespaced storage key the collection is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Watchlist => "movie-app-watchlist",
            Collection::Favorites => "movie-app-favorites",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Watchlist => "watchlist",
            Collection::Favorites => "favorites",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watchlist" => Ok(Collection::Watchlist),
            "favorites" | "favourites" => Ok(Collection::Favorites),
            other => Err(format!("Unknown collection: {}", other)),
        }
    }
}
