//! # Movie Search
//!
//! Paginated movie search: a reducer-driven state machine that fetches
//! results from a [`MovieCatalog`](movie_search_core::MovieCatalog) and
//! mirrors them to a session-scoped global store.
//!
//! - [`types`]: `MovieState`, `SearchAction`, `RequestId`
//! - [`reducer`]: `SearchReducer` and its `SearchEnvironment`
//! - [`controller`]: `MovieSearch`, the mounted search
//! - [`session`]: `SessionStore`, the production global store
//! - [`card`]: the result card style and its terminal rendering
//!
//! Fetch results carry the id of the request that produced them. A result
//! whose request was superseded by a newer query or page change is dropped,
//! so the state always reflects the latest (query, page).
//!
//! ## Example
//!
//! ```ignore
//! use movie_search::{MovieSearch, SearchEnvironment, SessionStore};
//! use movie_search_tmdb::TmdbCatalog;
//!
//! let session = SessionStore::new();
//! let search = MovieSearch::mount(SearchEnvironment::new(TmdbCatalog::from_env()?, session)).await?;
//!
//! search.set_search_query("batman").await?.wait().await;
//! for movie in search.state().await.movies {
//!     println!("{}", MovieCard::new(&movie));
//! }
//! ```

pub mod card;
pub mod controller;
pub mod reducer;
pub mod session;
pub mod types;

pub use card::{CardStyle, MovieCard, CARD_STYLE};
pub use controller::{MovieSearch, SearchStore};
pub use reducer::{SearchEnvironment, SearchReducer};
pub use session::SessionStore;
pub use types::{MovieState, RequestId, SearchAction};
