//! # Movie Search Testing
//!
//! Testing utilities and helpers for the movie search feature.
//!
//! This crate provides:
//! - Mock implementations of the environment traits
//! - Fixture builders for movies and result pages
//! - Property-based testing strategies
//! - A Given-When-Then harness and assertion helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use movie_search_testing::{movie, movie_page, InMemorySnapshotStore, MockMovieCatalog};
//!
//! #[tokio::test]
//! async fn test_first_page() {
//!     let catalog = MockMovieCatalog::new()
//!         .with_page("batman", movie_page(1, 5, vec![movie(1, "Batman")]));
//!     let snapshots = InMemorySnapshotStore::new();
//!
//!     let search = MovieSearch::mount(SearchEnvironment::new(catalog, snapshots)).await?;
//!     search.set_search_query("batman").await?.wait().await;
//! }
//! ```


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of the environment traits.
pub mod mocks {
    use futures::future::BoxFuture;
    use movie_search_core::catalog::{CatalogError, MovieCatalog};
    use movie_search_core::movie::MoviePage;
    use movie_search_core::snapshot::{SearchSnapshot, SnapshotStore};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use tokio::sync::Notify;

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    type RequestKey = (String, u32);

    #[derive(Default)]
    struct CatalogScript {
        responses: HashMap<RequestKey, Result<MoviePage, CatalogError>>,
        calls: Vec<RequestKey>,
        gated: bool,
        gates: HashMap<RequestKey, Arc<Notify>>,
    }

    impl CatalogScript {
        fn gate(&mut self, key: RequestKey) -> Arc<Notify> {
            Arc::clone(self.gates.entry(key).or_default())
        }
    }

    /// Scripted movie catalog.
    ///
    /// Responses are keyed by `(query, page)`. Unscripted requests fail with
    /// `CatalogError::Api { status: 404, .. }`. Every call is recorded.
    ///
    /// In gated mode each request blocks until the test calls
    /// [`MockMovieCatalog::release`] for it, which lets tests decide the
    /// order in which overlapping requests complete. Releasing before the
    /// request arrives is fine; the release is remembered.
    ///
    /// # Example
    ///
    /// ```
    /// use movie_search_testing::{movie, movie_page, MockMovieCatalog};
    /// use movie_search_core::MovieCatalog;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let catalog = MockMovieCatalog::new()
    ///     .with_page("heat", movie_page(1, 1, vec![movie(949, "Heat")]));
    ///
    /// let page = catalog.search_movies("heat", 1).await.ok();
    /// assert_eq!(page.map(|p| p.results.len()), Some(1));
    /// assert_eq!(catalog.calls(), vec![("heat".to_string(), 1)]);
    /// # }
    /// ```
    #[derive(Clone, Default)]
    pub struct MockMovieCatalog {
        script: Arc<Mutex<CatalogScript>>,
    }

    impl MockMovieCatalog {
        /// Create a catalog with no scripted responses
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a catalog whose requests wait for [`MockMovieCatalog::release`]
        #[must_use]
        pub fn gated() -> Self {
            let catalog = Self::default();
            lock(&catalog.script).gated = true;
            catalog
        }

        /// Script a successful response for `(query, page.page)`
        #[must_use]
        pub fn with_page(self, query: &str, page: MoviePage) -> Self {
            self.set_page(query, page);
            self
        }

        /// Script a failure for `(query, page)`
        #[must_use]
        pub fn with_failure(self, query: &str, page: u32, error: CatalogError) -> Self {
            lock(&self.script)
                .responses
                .insert((query.to_string(), page), Err(error));
            self
        }

        /// Script a successful response after construction
        pub fn set_page(&self, query: &str, page: MoviePage) {
            lock(&self.script)
                .responses
                .insert((query.to_string(), page.page), Ok(page));
        }

        /// Let the gated request for `(query, page)` complete
        pub fn release(&self, query: &str, page: u32) {
            lock(&self.script)
                .gate((query.to_string(), page))
                .notify_one();
        }

        /// Every `(query, page)` requested so far, in call order
        #[must_use]
        pub fn calls(&self) -> Vec<(String, u32)> {
            lock(&self.script).calls.clone()
        }
    }

    impl MovieCatalog for MockMovieCatalog {
        fn search_movies<'a>(
            &'a self,
            query: &'a str,
            page: u32,
        ) -> BoxFuture<'a, Result<MoviePage, CatalogError>> {
            let key = (query.to_string(), page);

            let (response, gate) = {
                let mut script = lock(&self.script);
                script.calls.push(key.clone());

                let response = script.responses.get(&key).cloned().unwrap_or_else(|| {
                    Err(CatalogError::Api {
                        status: 404,
                        message: format!("no scripted response for {query:?} page {page}"),
                    })
                });
                let gate = script.gated.then(|| script.gate(key));
                (response, gate)
            };

            Box::pin(async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                response
            })
        }
    }

    /// In-memory global store that records every save.
    #[derive(Clone, Default)]
    pub struct InMemorySnapshotStore {
        current: Arc<Mutex<SearchSnapshot>>,
        history: Arc<Mutex<Vec<SearchSnapshot>>>,
    }

    impl InMemorySnapshotStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store holding a previous search
        #[must_use]
        pub fn with_snapshot(snapshot: SearchSnapshot) -> Self {
            let store = Self::default();
            *lock(&store.current) = snapshot;
            store
        }

        /// Every snapshot saved so far, oldest first
        #[must_use]
        pub fn saves(&self) -> Vec<SearchSnapshot> {
            lock(&self.history).clone()
        }

        /// The most recently saved snapshot, if any
        #[must_use]
        pub fn last_save(&self) -> Option<SearchSnapshot> {
            lock(&self.history).last().cloned()
        }
    }

    impl SnapshotStore for InMemorySnapshotStore {
        fn load(&self) -> SearchSnapshot {
            lock(&self.current).clone()
        }

        fn save(&self, snapshot: SearchSnapshot) {
            lock(&self.history).push(snapshot.clone());
            *lock(&self.current) = snapshot;
        }
    }
}

/// Fixture builders.
pub mod fixtures {
    use movie_search_core::movie::{Movie, MoviePage};

    /// A movie with only an id and title
    #[must_use]
    pub fn movie(id: u64, title: &str) -> Movie {
        Movie::new(id, title)
    }

    /// A result page; `total_results` assumes 20 results per page
    #[must_use]
    pub fn movie_page(page: u32, total_pages: u32, results: Vec<Movie>) -> MoviePage {
        MoviePage {
            results,
            page,
            total_pages,
            total_results: total_pages.saturating_mul(20),
        }
    }
}

/// Property-based testing strategies.
pub mod properties {
    use movie_search_core::movie::Movie;
    use movie_search_core::snapshot::SearchSnapshot;
    use proptest::prelude::*;

    /// Any movie with a short alphanumeric title
    pub fn arb_movie() -> impl Strategy<Value = Movie> {
        (any::<u64>(), "[a-zA-Z0-9 ]{1,16}").prop_map(|(id, title)| Movie::new(id, title))
    }

    /// A consistent snapshot: `1 <= page <= number_of_pages` when pages exist
    pub fn arb_snapshot() -> impl Strategy<Value = SearchSnapshot> {
        (
            prop::collection::vec(arb_movie(), 0..5),
            "[a-z ]{0,12}",
            0u32..50,
        )
            .prop_flat_map(|(movies, search_query, number_of_pages)| {
                let max_page = number_of_pages.max(1);
                (1..=max_page).prop_map(move |page| SearchSnapshot {
                    movies: movies.clone(),
                    search_query: search_query.clone(),
                    page,
                    number_of_pages,
                })
            })
    }
}

// Re-export commonly used items
pub use fixtures::{movie, movie_page};
pub use mocks::{InMemorySnapshotStore, MockMovieCatalog};
