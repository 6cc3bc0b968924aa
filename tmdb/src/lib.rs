//! # TMDB Movie Catalog
//!
//! [`MovieCatalog`](movie_search_core::MovieCatalog) implementation backed by
//! The Movie Database `/search/movie` endpoint.
//!
//! ## Example
//!
//! ```no_run
//! use movie_search_tmdb::TmdbCatalog;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads TMDB_API_TOKEN or TMDB_API_KEY
//!     let catalog = TmdbCatalog::from_env()?;
//!
//!     let page = catalog.search("blade runner", 1).await?;
//!     for movie in page.results {
//!         println!("{} ({:?})", movie.title, movie.release_year());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;

// Re-export main types for convenience
pub use client::TmdbCatalog;
pub use config::{ConfigError, Credentials, TmdbConfig};
