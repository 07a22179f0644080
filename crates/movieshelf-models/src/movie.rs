use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Catalog identifier of a movie. Primary key for every membership and dedup check.
pub type MovieId = i64;

/// Canonical movie record as seen by everything past the normalizer.
///
/// `rating` is `NaN` when the catalog supplied something non-numeric; such a
/// movie is "unranked" and sorts after every rated movie (see [`rating_desc`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(with = "rating_serde", default = "unranked")]
    pub rating: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    // Optional detail fields, only present on some catalog payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
}

impl Movie {
    /// Create a movie with only the required fields set
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            release_date: None,
            poster_url: String::new(),
            rating: f64::NAN,
            genres: Vec::new(),
            year: None,
            backdrop_url: None,
            director: None,
            cast: None,
            runtime: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// True when the rating is a usable number
    pub fn is_ranked(&self) -> bool {
        !self.rating.is_nan()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

fn unranked() -> f64 {
    f64::NAN
}

/// Descending-rating comparator. Unranked (`NaN`) movies compare after all
/// rated ones and equal to each other, so a stable sort keeps their order.
pub fn rating_desc(a: &Movie, b: &Movie) -> Ordering {
    match (a.is_ranked(), b.is_ranked()) {
        (true, true) => b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// JSON has no NaN, so the unranked rating is stored as `null`.
mod rating_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(rating: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if rating.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*rating)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
