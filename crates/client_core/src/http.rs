use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shared::{
    domain::{Category, Movie, MovieId},
    protocol::FAVOURITES_RESOURCE,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::service::MovieService;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid backend url '{0}'")]
    InvalidBaseUrl(String),
    #[error("{method} {url} failed with status {status}")]
    UnexpectedStatus {
        method: &'static str,
        url: String,
        status: StatusCode,
    },
}

/// [`MovieService`] over a json-server style REST backend.
#[derive(Debug, Clone)]
pub struct HttpMovieService {
    http: Client,
    base_url: Url,
}

impl HttpMovieService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            Url::parse(base_url).map_err(|_| ServiceError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ServiceError::InvalidBaseUrl(base_url.to_string()).into());
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn ensure_success(method: &'static str, res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    Err(ServiceError::UnexpectedStatus {
        method,
        url: res.url().to_string(),
        status,
    }
    .into())
}

#[async_trait]
impl MovieService for HttpMovieService {
    async fn list_movies(&self, category: Category) -> Result<Vec<Movie>> {
        let url = self.endpoint(&[category.path()])?;
        debug!(%url, "GET movie list");
        let res = self.http.get(url).send().await?;
        let movies = ensure_success("GET", res)?
            .json::<Vec<Movie>>()
            .await
            .with_context(|| format!("failed to decode '{category}' listing"))?;
        Ok(movies)
    }

    async fn get_movie_by_id(&self, category: Category, id: &MovieId) -> Result<Movie> {
        let url = self.endpoint(&[category.path(), id.as_str()])?;
        debug!(%url, "GET movie");
        let res = self.http.get(url).send().await?;
        let movie = ensure_success("GET", res)?
            .json::<Movie>()
            .await
            .with_context(|| format!("failed to decode movie '{id}'"))?;
        Ok(movie)
    }

    async fn add_favourite(&self, movie: &Movie) -> Result<Option<Movie>> {
        let url = self.endpoint(&[FAVOURITES_RESOURCE])?;
        debug!(%url, movie_id = %movie.id, "POST favourite");
        let res = self.http.post(url).json(movie).send().await?;
        let body = ensure_success("POST", res)?.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value =
            serde_json::from_slice(&body).context("failed to decode favourite response")?;
        match value {
            Value::Null => Ok(None),
            Value::Object(ref fields) if fields.is_empty() => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .context("failed to decode favourite response"),
        }
    }

    async fn remove_favourite(&self, id: &MovieId) -> Result<bool> {
        let url = self.endpoint(&[FAVOURITES_RESOURCE, id.as_str()])?;
        debug!(%url, "DELETE favourite");
        let res = self.http.delete(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success("DELETE", res)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
