//! Movie catalog trait: the external search API as seen by the reducer.
//!
//! # Implementations
//!
//! - `TmdbCatalog` (in `movie-search-tmdb`): production HTTP client
//! - `MockMovieCatalog` (in `movie-search-testing`): scripted responses for tests
//!
//! # Example
//!
//! ```no_run
//! use movie_search_core::catalog::{CatalogError, MovieCatalog};
//!
//! async fn first_titles<C: MovieCatalog>(catalog: &C) -> Result<Vec<String>, CatalogError> {
//!     let page = catalog.search_movies("dune", 1).await?;
//!     Ok(page.results.into_iter().map(|movie| movie.title).collect())
//! }
//! ```

use crate::movie::MoviePage;
use futures::future::BoxFuture;
use thiserror::Error;

/// Errors that can occur while searching the catalog.
///
/// Every variant is treated the same by the search reducer ("fetch failed"):
/// it is logged and the current state is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid credentials
    #[error("Unauthorized - invalid credentials")]
    Unauthorized,

    /// API returned an error status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body from the API
        message: String,
    },
}

/// Search interface of the external movie API.
///
/// # Dyn Compatibility
///
/// Returns a boxed future instead of using `async fn` so the catalog can be
/// held as `Arc<dyn MovieCatalog>` and moved into effects.
pub trait MovieCatalog: Send + Sync {
    /// Search movies by free-text query.
    ///
    /// `page` is 1-based. The query is passed through unmodified.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for transport, status, or decoding failures.
    fn search_movies<'a>(
        &'a self,
        query: &'a str,
        page: u32,
    ) -> BoxFuture<'a, Result<MoviePage, CatalogError>>;
}
