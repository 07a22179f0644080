// Raw endpoint calls against the catalog's REST API. Everything here returns
// undecoded JSON records; normalization happens in the client.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::CatalogError;
use movieshelf_models::MovieId;

/// Join the configured base URL and an endpoint path
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// GET /movies
pub async fn get_movies(client: &Client, base_url: &str) -> Result<Vec<Value>, CatalogError> {
    get_records(client, &endpoint(base_url, "movies"), &[]).await
}

/// GET /movies/random
pub async fn get_random_movies(
    client: &Client,
    base_url: &str,
) -> Result<Vec<Value>, CatalogError> {
    get_records(client, &endpoint(base_url, "movies/random"), &[]).await
}

/// GET /movies/genre/{genre}
pub async fn get_movies_by_genre(
    client: &Client,
    base_url: &str,
    genre: &str,
) -> Result<Vec<Value>, CatalogError> {
    let path = format!("movies/genre/{}", urlencoding::encode(genre));
    get_records(client, &endpoint(base_url, &path), &[]).await
}

/// GET /movies/genres?selected=g1,g2
pub async fn get_movies_by_genres(
    client: &Client,
    base_url: &str,
    genres: &[&str],
) -> Result<Vec<Value>, CatalogError> {
    let selected = genres.join(",");
    get_records(client, &endpoint(base_url, "movies/genres"), &[("selected", selected)]).await
}

/// GET /movies/search?query={q}
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<Value>, CatalogError> {
    get_records(
        client,
        &endpoint(base_url, "movies/search"),
        &[("query", query.to_string())],
    )
    .await
}

/// GET /movie/{id}. Any non-success status means the movie doesn't exist.
pub async fn get_movie(
    client: &Client,
    base_url: &str,
    id: MovieId,
) -> Result<Value, CatalogError> {
    let url = endpoint(base_url, &format!("movie/{}", id));
    debug!("Catalog request: GET {}", url);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        debug!("Catalog lookup for movie {} returned {}", id, response.status());
        return Err(CatalogError::NotFound(id));
    }

    let record: Value = response
        .json()
        .await
        .map_err(|e| CatalogError::FetchFailed(format!("invalid movie body for {}: {}", id, e)))?;
    Ok(record)
}

async fn get_records(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<Vec<Value>, CatalogError> {
    debug!("Catalog request: GET {} {:?}", url, query);

    let response = client
        .get(url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(CatalogError::FetchFailed(format!(
            "GET {} returned {} - {}",
            url, status, error_text
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| CatalogError::FetchFailed(format!("invalid JSON from {}: {}", url, e)))?;

    match body {
        Value::Array(records) => Ok(records),
        other => Err(CatalogError::FetchFailed(format!(
            "expected a list of movies from {}, got {}",
            url,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
