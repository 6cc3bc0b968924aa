//! TMDB API client implementation

use crate::config::{ConfigError, Credentials, TmdbConfig};
use futures::future::BoxFuture;
use movie_search_core::catalog::{CatalogError, MovieCatalog};
use movie_search_core::movie::MoviePage;
use reqwest::{Client, StatusCode};
use serde::Serialize;

/// Query string of `GET /search/movie`
#[derive(Debug, Serialize)]
struct SearchMovieQuery<'a> {
    query: &'a str,
    page: u32,
    include_adult: bool,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// TMDB movie catalog
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: Client,
    config: TmdbConfig,
}

impl TmdbCatalog {
    /// Create a catalog from environment configuration
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if credentials are missing or a variable is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(TmdbConfig::from_env()?))
    }

    /// Create a catalog with explicit configuration
    #[must_use]
    pub fn new(config: TmdbConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Falling back to default HTTP client");
                Client::new()
            });

        Self { client, config }
    }

    /// The configuration this catalog was built with
    #[must_use]
    pub const fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Search movies by title
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    #[tracing::instrument(skip(self), name = "tmdb_search_movies")]
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        let api_key = match &self.config.credentials {
            Credentials::ApiKey(key) => Some(key.as_str()),
            Credentials::Bearer(_) => None,
        };

        let params = SearchMovieQuery {
            query,
            page,
            include_adult: self.config.include_adult,
            language: &self.config.language,
            api_key,
        };

        let mut request = self
            .client
            .get(format!("{}/search/movie", self.config.base_url))
            .header("accept", "application/json")
            .query(&params);

        if let Credentials::Bearer(token) = &self.config.credentials {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let page = response
                    .json::<MoviePage>()
                    .await
                    .map_err(|e| CatalogError::ResponseParseFailed(e.to_string()))?;
                tracing::debug!(
                    page = page.page,
                    total_pages = page.total_pages,
                    results = page.results.len(),
                    "search succeeded"
                );
                Ok(page)
            },
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CatalogError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

impl MovieCatalog for TmdbCatalog {
    fn search_movies<'a>(
        &'a self,
        query: &'a str,
        page: u32,
    ) -> BoxFuture<'a, Result<MoviePage, CatalogError>> {
        Box::pin(self.search(query, page))
    }
}
