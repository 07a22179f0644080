// Conversion of raw catalog JSON into the canonical Movie shape.
//
// The catalog has shipped two naming conventions: the provider columns
// ("MovieID", "Release Date", ...) and the camelCase names of the stored
// representation. Both are accepted; provider names win when both exist.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::movie::{Movie, MovieId};

const ID_KEYS: &[&str] = &["MovieID", "id"];
const TITLE_KEYS: &[&str] = &["Title", "title"];
const OVERVIEW_KEYS: &[&str] = &["Overview", "overview"];
const RELEASE_DATE_KEYS: &[&str] = &["Release Date", "releaseDate"];
const POSTER_KEYS: &[&str] = &["Poster URL", "posterUrl"];
const RATING_KEYS: &[&str] = &["Rating", "rating"];
const GENRE_KEYS: &[&str] = &["Genres", "genres"];
const ADULT_KEYS: &[&str] = &["Adult", "adult"];

/// Genre separators used by the different catalog endpoints
const GENRE_DELIMITERS: &[char] = &[',', '|'];

/// Normalize one raw catalog record.
///
/// Fails only when `id` or `title` is absent or has the wrong type. Every other
/// field degrades: a bad rating becomes `NaN`, a bad date leaves `year` unset.
pub fn normalize_record(raw: &Value) -> Result<Movie, NormalizeError> {
    let record = raw
        .as_object()
        .ok_or_else(|| NormalizeError::invalid("record", "is not a JSON object"))?;

    let id = parse_id(lookup(record, ID_KEYS).ok_or_else(|| NormalizeError::missing("id"))?)?;

    let title = match lookup(record, TITLE_KEYS) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => return Err(NormalizeError::invalid("title", "is empty")),
        Some(other) => {
            return Err(NormalizeError::invalid(
                "title",
                format!("has unexpected type: {}", other),
            ))
        }
        None => return Err(NormalizeError::missing("title")),
    };

    let release_date = lookup_str(record, RELEASE_DATE_KEYS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let year = release_date.as_deref().and_then(extract_year);

    let genres = match lookup(record, GENRE_KEYS) {
        Some(Value::String(s)) => split_genres(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Ok(Movie {
        id,
        title,
        overview: lookup_str(record, OVERVIEW_KEYS).unwrap_or_default().to_string(),
        release_date,
        poster_url: lookup_str(record, POSTER_KEYS).unwrap_or_default().to_string(),
        rating: lookup(record, RATING_KEYS).map(parse_rating).unwrap_or(f64::NAN),
        genres,
        year,
        backdrop_url: lookup_str(record, &["backdropUrl", "Backdrop URL"]).map(str::to_string),
        director: lookup_str(record, &["director", "Director"]).map(str::to_string),
        cast: lookup(record, &["cast", "Cast"]).and_then(parse_cast),
        runtime: lookup(record, &["runtime", "Runtime"])
            .and_then(Value::as_u64)
            .and_then(|r| u32::try_from(r).ok()),
    })
}

/// Whether the catalog flagged the record as adult content
pub fn is_adult(raw: &Value) -> bool {
    let Some(record) = raw.as_object() else {
        return false;
    };
    match lookup(record, ADULT_KEYS) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        _ => false,
    }
}

/// Split a delimiter-joined genre field into trimmed, non-empty genres.
///
/// Both `,` and `|` are treated as separators.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(GENRE_DELIMITERS)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a rating that may arrive as a number or a numeric string.
///
/// Strings are read up to the end of their leading decimal number, so
/// `"7.5/10"` is 7.5. Anything without one yields `NaN` (unranked).
pub fn parse_rating(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim_start();
            s[..numeric_prefix_len(s)].parse::<f64>().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Byte length of the `[+-]digits[.digits][e[+-]digits]` prefix of `s`
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if frac_end > int_end + 1 || int_end > end {
            mantissa_end = frac_end;
        }
    }
    if mantissa_end == end {
        return 0;
    }

    if matches!(bytes.get(mantissa_end), Some(b'e' | b'E')) {
        let mut exp = mantissa_end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            return exp_end;
        }
    }
    mantissa_end
}

/// Calendar year of a release date, or `None` when the date can't be read.
pub fn extract_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.year());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Some(dt.year());
        }
    }
    // HTTP-date style, e.g. "Tue, 15 Mar 2022 00:00:00 GMT"
    if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        return Some(dt.year());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.year());
    }

    None
}

fn parse_id(raw: &Value) -> Result<MovieId, NormalizeError> {
    let Value::Number(n) = raw else {
        return Err(NormalizeError::invalid(
            "id",
            format!("has unexpected type: {}", raw),
        ));
    };

    if let Some(id) = n.as_i64() {
        return Ok(id);
    }
    // Columnar exports sometimes widen integer ids to floats (e.g. 42.0)
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(NormalizeError::invalid("id", format!("is not an integer: {}", n))),
    }
}

fn parse_cast(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) => Some(split_genres(s)),
        _ => None,
    }
}

/// First non-null value among the candidate keys
fn lookup<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn lookup_str<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    lookup(record, keys).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider_record() -> Value {
        json!({
            "MovieID": 603,
            "Title": "The Matrix",
            "Overview": "A hacker learns the truth.",
            "Release Date": "1999-03-31",
            "Poster URL": "https://img/matrix.jpg",
            "Rating": "8.7",
            "Genres": "Action, Science Fiction"
        })
    }

    #[test]
    fn test_normalize_provider_record() {
        let movie = normalize_record(&provider_record()).unwrap();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.overview, "A hacker learns the truth.");
        assert_eq!(movie.release_date.as_deref(), Some("1999-03-31"));
        assert_eq!(movie.poster_url, "https://img/matrix.jpg");
        assert_eq!(movie.rating, 8.7);
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.year, Some(1999));
    }

    #[test]
    fn test_normalize_canonical_record() {
        let raw = json!({
            "id": 11,
            "title": "Star Wars",
            "releaseDate": "1977-05-25",
            "posterUrl": "https://img/sw.jpg",
            "rating": 8.2,
            "genres": ["Adventure", " Action "],
            "director": "George Lucas",
            "runtime": 121
        });
        let movie = normalize_record(&raw).unwrap();
        assert_eq!(movie.id, 11);
        assert_eq!(movie.genres, vec!["Adventure", "Action"]);
        assert_eq!(movie.year, Some(1977));
        assert_eq!(movie.director.as_deref(), Some("George Lucas"));
        assert_eq!(movie.runtime, Some(121));
        assert_eq!(movie.overview, "");
    }

    #[test]
    fn test_split_genres_on_either_delimiter() {
        assert_eq!(split_genres("Action, Drama"), vec!["Action", "Drama"]);
        assert_eq!(split_genres("Action|Drama"), vec!["Action", "Drama"]);
        assert_eq!(split_genres(" Action | | Drama ,"), vec!["Action", "Drama"]);
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn test_absent_genres_normalize_to_empty() {
        let mut raw = provider_record();
        raw.as_object_mut().unwrap().remove("Genres");
        assert!(normalize_record(&raw).unwrap().genres.is_empty());

        raw["Genres"] = Value::Null;
        assert!(normalize_record(&raw).unwrap().genres.is_empty());
    }

    #[test]
    fn test_rating_coercion() {
        assert_eq!(parse_rating(&json!("7.5")), 7.5);
        assert_eq!(parse_rating(&json!(7)), 7.0);
        assert!(parse_rating(&json!("N/A")).is_nan());
        assert_eq!(parse_rating(&json!("7.5/10")), 7.5);
        assert_eq!(parse_rating(&json!(" 8 stars")), 8.0);
        assert_eq!(parse_rating(&json!(".5")), 0.5);
        assert_eq!(parse_rating(&json!("6.")), 6.0);
        assert_eq!(parse_rating(&json!("1e1x")), 10.0);
        assert_eq!(parse_rating(&json!("3e")), 3.0);
        assert!(parse_rating(&json!("-")).is_nan());
        assert!(parse_rating(&json!(".")).is_nan());
        assert!(parse_rating(&json!("")).is_nan());
        assert!(parse_rating(&json!("inf")).is_nan());
        assert!(parse_rating(&json!(null)).is_nan());
        assert!(parse_rating(&json!([1])).is_nan());
    }

    #[test]
    fn test_missing_rating_is_unranked() {
        let mut raw = provider_record();
        raw.as_object_mut().unwrap().remove("Rating");
        assert!(!normalize_record(&raw).unwrap().is_ranked());
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let mut raw = provider_record();
        raw.as_object_mut().unwrap().remove("MovieID");
        let err = normalize_record(&raw).unwrap_err();
        assert_eq!(err, NormalizeError::missing("id"));
    }

    #[test]
    fn test_untyped_id_is_malformed() {
        let mut raw = provider_record();
        raw["MovieID"] = json!("603");
        assert!(matches!(
            normalize_record(&raw),
            Err(NormalizeError::MalformedRecord { field: "id", .. })
        ));

        raw["MovieID"] = json!(603.5);
        assert!(normalize_record(&raw).is_err());
    }

    #[test]
    fn test_float_encoded_id_is_accepted() {
        let mut raw = provider_record();
        raw["MovieID"] = json!(603.0);
        assert_eq!(normalize_record(&raw).unwrap().id, 603);
    }

    #[test]
    fn test_missing_or_blank_title_is_malformed() {
        let mut raw = provider_record();
        raw["Title"] = json!("   ");
        assert!(matches!(
            normalize_record(&raw),
            Err(NormalizeError::MalformedRecord { field: "title", .. })
        ));

        raw["Title"] = json!(42);
        assert!(normalize_record(&raw).is_err());

        raw.as_object_mut().unwrap().remove("Title");
        assert_eq!(normalize_record(&raw).unwrap_err(), NormalizeError::missing("title"));
    }

    #[test]
    fn test_non_object_record_is_malformed() {
        assert!(normalize_record(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_unparseable_date_keeps_record() {
        let mut raw = provider_record();
        raw["Release Date"] = json!("sometime in the nineties");
        let movie = normalize_record(&raw).unwrap();
        assert_eq!(movie.year, None);
        assert_eq!(movie.release_date.as_deref(), Some("sometime in the nineties"));
    }

    #[test]
    fn test_extract_year_formats() {
        assert_eq!(extract_year("2010-07-16"), Some(2010));
        assert_eq!(extract_year("2010-07-16T00:00:00Z"), Some(2010));
        assert_eq!(extract_year("2010-07-16T00:00:00"), Some(2010));
        assert_eq!(extract_year("Fri, 16 Jul 2010 00:00:00 GMT"), Some(2010));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("16/07/2010"), None);
    }

    #[test]
    fn test_is_adult() {
        assert!(is_adult(&json!({"Adult": true})));
        assert!(is_adult(&json!({"adult": "True"})));
        assert!(!is_adult(&json!({"Adult": false})));
        assert!(!is_adult(&provider_record()));
    }
}
