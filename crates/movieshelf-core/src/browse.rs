use movieshelf_catalog::is_unfiltered_genre;
use movieshelf_models::{rating_desc, Movie};
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const RECENT_WINDOW_YEARS: i32 = 5;
pub const TRENDING_LIMIT: usize = 10;

const TRENDING_RATING_WEIGHT: f64 = 0.7;
const TRENDING_YEAR_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive ascending
    #[default]
    Title,
    /// Newest first, unknown year last
    Year,
    /// Highest first, unranked last
    Rating,
}

/// Sorted, de-duplicated genres across a batch (for genre pickers)
pub fn available_genres(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .flat_map(|m| m.genres.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Movies tagged with `genre`; the `All` sentinel or an empty genre keeps everything
pub fn filter_by_genre(movies: &[Movie], genre: &str) -> Vec<Movie> {
    if is_unfiltered_genre(genre) {
        return movies.to_vec();
    }
    let genre = genre.trim();
    movies.iter().filter(|m| m.has_genre(genre)).cloned().collect()
}

/// Stable in-place sort
pub fn sort_movies(movies: &mut [Movie], key: SortKey) {
    match key {
        SortKey::Title => movies.sort_by_cached_key(|m| m.title.to_lowercase()),
        SortKey::Year => movies.sort_by(year_desc),
        SortKey::Rating => movies.sort_by(rating_desc),
    }
}

fn year_desc(a: &Movie, b: &Movie) -> Ordering {
    match (a.year, b.year) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Movies released within `window` years of `current_year`, newest first
pub fn recent_releases(movies: &[Movie], current_year: i32, window: i32) -> Vec<Movie> {
    let cutoff = current_year - window;
    let mut recent: Vec<Movie> = movies
        .iter()
        .filter(|m| m.year.is_some_and(|y| y >= cutoff))
        .cloned()
        .collect();
    recent.sort_by(year_desc);
    recent
}

/// Weighted blend of rating and release year; `None` when either is unknown
pub fn trending_score(movie: &Movie) -> Option<f64> {
    let year = movie.year?;
    if !movie.is_ranked() {
        return None;
    }
    Some(movie.rating * TRENDING_RATING_WEIGHT + f64::from(year) * TRENDING_YEAR_WEIGHT)
}

/// The `limit` highest trending scores; unscorable movies sort after all scored ones
pub fn trending(movies: &[Movie], limit: usize) -> Vec<Movie> {
    let mut scored: Vec<(Option<f64>, &Movie)> =
        movies.iter().map(|m| (trending_score(m), m)).collect();
    scored.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    scored.into_iter().take(limit).map(|(_, m)| m.clone()).collect()
}
