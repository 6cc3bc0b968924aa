//! Reducer logic for the movie search.
//!
//! Every query or page change decides synchronously whether a fetch is
//! needed. Fetches are tagged with the state's request counter, and a result
//! is applied only if its tag is still the latest one, so a slow response for
//! a superseded (query, page) can never overwrite a newer one.

use crate::types::{MovieState, RequestId, SearchAction};
use movie_search_core::{
    async_effect,
    catalog::MovieCatalog,
    effect::Effect,
    reducer::Reducer,
    smallvec,
    snapshot::SnapshotStore,
    SmallVec,
};
use movie_search_core::snapshot::SearchSnapshot;
use movie_search_runtime::metrics::{SEARCH_FETCH_FAILED, SEARCH_FETCH_ISSUED, SEARCH_FETCH_STALE};
use std::sync::{Arc, Mutex, PoisonError};

/// Ordered writes to the global store.
///
/// Persist effects run as independent tasks and may finish in any order.
/// Each write is tagged with the request id current when it was emitted; a
/// write older than the last one applied is dropped.
struct SnapshotWriter {
    snapshots: Arc<dyn SnapshotStore>,
    last_written: Mutex<Option<RequestId>>,
}

impl SnapshotWriter {
    fn new(snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            snapshots,
            last_written: Mutex::new(None),
        }
    }

    fn write(&self, revision: RequestId, snapshot: SearchSnapshot) {
        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if last_written.is_some_and(|last| revision <= last) {
            tracing::debug!(revision = %revision, "Skipping outdated snapshot write");
            return;
        }

        self.snapshots.save(snapshot);
        *last_written = Some(revision);
    }
}

/// Environment dependencies for the search reducer
#[derive(Clone)]
pub struct SearchEnvironment {
    /// External movie search API
    pub catalog: Arc<dyn MovieCatalog>,
    /// Global store the latest results are mirrored to
    pub snapshots: Arc<dyn SnapshotStore>,
    writer: Arc<SnapshotWriter>,
}

impl SearchEnvironment {
    /// Creates a new `SearchEnvironment`
    #[must_use]
    pub fn new<C, S>(catalog: C, snapshots: S) -> Self
    where
        C: MovieCatalog + 'static,
        S: SnapshotStore + 'static,
    {
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(snapshots);
        Self {
            catalog: Arc::new(catalog),
            writer: Arc::new(SnapshotWriter::new(Arc::clone(&snapshots))),
            snapshots,
        }
    }

    /// Same collaborators, with write ordering restarted for a new mount
    #[must_use]
    pub(crate) fn remount(self) -> Self {
        Self {
            writer: Arc::new(SnapshotWriter::new(Arc::clone(&self.snapshots))),
            ..self
        }
    }
}

impl std::fmt::Debug for SearchEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the movie search
#[derive(Clone, Debug, Default)]
pub struct SearchReducer;

impl SearchReducer {
    /// Creates a new `SearchReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// React to a change of query or page.
    ///
    /// Empty query: clear and invalidate whatever is in flight.
    /// Otherwise: issue a fetch for the current (query, page).
    fn on_query_or_page_change(
        state: &mut MovieState,
        env: &SearchEnvironment,
    ) -> SmallVec<[Effect<SearchAction>; 4]> {
        if state.is_idle() {
            return Self::reset(state, env);
        }

        let request_id = state.issue_request();
        tracing::debug!(
            query = %state.search_query,
            page = state.page,
            request = %request_id,
            "Issuing movie search"
        );
        metrics::counter!(SEARCH_FETCH_ISSUED).increment(1);

        smallvec![Self::fetch(env, state.search_query.clone(), state.page, request_id)]
    }

    fn reset(state: &mut MovieState, env: &SearchEnvironment) -> SmallVec<[Effect<SearchAction>; 4]> {
        state.clear();
        state.issue_request();
        smallvec![Self::persist(state, env)]
    }

    /// Effect: search the catalog and report back
    fn fetch(
        env: &SearchEnvironment,
        query: String,
        page: u32,
        request_id: RequestId,
    ) -> Effect<SearchAction> {
        let catalog = Arc::clone(&env.catalog);
        async_effect! {
            match catalog.search_movies(&query, page).await {
                Ok(page) => Some(SearchAction::FetchSucceeded { request_id, page }),
                Err(error) => Some(SearchAction::FetchFailed {
                    request_id,
                    reason: error.to_string(),
                }),
            }
        }
    }

    /// Effect: mirror the current state to the global store
    fn persist(state: &MovieState, env: &SearchEnvironment) -> Effect<SearchAction> {
        let writer = Arc::clone(&env.writer);
        let revision = state.latest_request;
        let snapshot = state.snapshot();
        async_effect! {
            writer.write(revision, snapshot);
            None::<SearchAction>
        }
    }
}

impl Reducer for SearchReducer {
    type State = MovieState;
    type Action = SearchAction;
    type Environment = SearchEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== User intents ==========
            SearchAction::SetQuery { query } => {
                state.search_query = query;
                state.page = 1;
                state.movies.clear();
                state.number_of_pages = 0;
                Self::on_query_or_page_change(state, env)
            },
            SearchAction::IncrementPage => {
                if !state.has_next_page() {
                    return smallvec![Effect::None];
                }
                state.page += 1;
                Self::on_query_or_page_change(state, env)
            },
            SearchAction::DecrementPage => {
                if !state.has_previous_page() {
                    return smallvec![Effect::None];
                }
                state.page -= 1;
                Self::on_query_or_page_change(state, env)
            },
            SearchAction::Refresh => Self::on_query_or_page_change(state, env),
            SearchAction::Reset => Self::reset(state, env),

            // ========== Fetch outcomes ==========
            SearchAction::FetchSucceeded { request_id, page } => {
                if request_id != state.latest_request {
                    tracing::debug!(
                        request = %request_id,
                        latest = %state.latest_request,
                        "Discarding superseded search result"
                    );
                    metrics::counter!(SEARCH_FETCH_STALE).increment(1);
                    return smallvec![Effect::None];
                }

                tracing::debug!(
                    request = %request_id,
                    page = page.page,
                    total_pages = page.total_pages,
                    results = page.results.len(),
                    "Applying search result"
                );
                state.movies = page.results;
                state.number_of_pages = page.total_pages;
                state.page = page.page.max(1);

                smallvec![Self::persist(state, env)]
            },
            SearchAction::FetchFailed { request_id, reason } => {
                if request_id != state.latest_request {
                    tracing::debug!(
                        request = %request_id,
                        latest = %state.latest_request,
                        error = %reason,
                        "Ignoring failure of superseded search"
                    );
                    metrics::counter!(SEARCH_FETCH_STALE).increment(1);
                    return smallvec![Effect::None];
                }

                tracing::warn!(
                    request = %request_id,
                    query = %state.search_query,
                    page = state.page,
                    error = %reason,
                    "Movie search failed"
                );
                metrics::counter!(SEARCH_FETCH_FAILED).increment(1);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_search_core::{movie::Movie, snapshot::SearchSnapshot};
    use movie_search_testing::{
        assertions, movie, movie_page, InMemorySnapshotStore, MockMovieCatalog, ReducerTest,
    };

    fn env() -> SearchEnvironment {
        SearchEnvironment::new(MockMovieCatalog::new(), InMemorySnapshotStore::new())
    }

    fn loaded(query: &str, page: u32, number_of_pages: u32) -> MovieState {
        MovieState::initialize(SearchSnapshot {
            movies: vec![movie(1, "Batman"), movie(2, "Batman Returns")],
            search_query: query.to_string(),
            page,
            number_of_pages,
        })
    }

    #[test]
    fn test_increment_on_last_page_is_noop() {
        let before = loaded("batman", 5, 5);
        let expected = before.clone();

        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(SearchAction::IncrementPage)
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_increment_before_first_result_moves_on() {
        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(MovieState::default())
            .when_action(SearchAction::SetQuery { query: "batman".into() })
            .when_action(SearchAction::IncrementPage)
            .then_state(|state| {
                assert_eq!(state.page, 2);
                assert_eq!(state.number_of_pages, 0);
                assert_eq!(state.latest_request, RequestId::new(2));
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_increment_issues_fetch() {
        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(loaded("batman", 2, 5))
            .when_action(SearchAction::IncrementPage)
            .then_state(|state| {
                assert_eq!(state.page, 3);
                assert_eq!(state.latest_request, RequestId::new(1));
                // Results of the previous page stay visible while loading
                assert_eq!(state.movies.len(), 2);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_decrement_on_first_page_is_noop() {
        let before = loaded("batman", 1, 5);
        let expected = before.clone();

        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(SearchAction::DecrementPage)
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_decrement_issues_fetch() {
        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(loaded("batman", 3, 5))
            .when_action(SearchAction::DecrementPage)
            .then_state(|state| assert_eq!(state.page, 2))
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn test_set_query_resets_to_first_page() {
        ReducerTest::new(SearchReducer::new())
            .with_env(env())
            .given_state(loaded("batman", 4, 5))
            .when_action(SearchAction::SetQuery { query: "superman".into() })
            .then_state(|state| {
                assert_eq!(state.search_query, "superman");
                assert_eq!(state.page, 1);
                assert!(state.movies.is_empty());
                assert_eq!(state.number_of_pages, 0);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_empty_query_resets_without_fetch() {
        let catalog = MockMovieCatalog::new();
        let env = SearchEnvironment::new(catalog.clone(), InMemorySnapshotStore::new());
        let mut state = loaded("batman", 2, 5);

        let effects = SearchReducer::new().reduce(
            &mut state,
            SearchAction::SetQuery { query: String::new() },
            &env,
        );

        assert!(state.movies.is_empty());
        assert_eq!(state.number_of_pages, 0);
        assert_eq!(state.page, 1);
        assert!(state.is_idle());
        // Only the persist effect; the catalog is never asked
        assert_eq!(assertions::count_future_effects(&effects), 1);
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn test_matching_result_is_applied() {
        let mut state = MovieState::default();
        let reducer = SearchReducer::new();
        let env = env();

        reducer.reduce(&mut state, SearchAction::SetQuery { query: "batman".into() }, &env);
        let request_id = state.latest_request;

        let effects = reducer.reduce(
            &mut state,
            SearchAction::FetchSucceeded {
                request_id,
                page: movie_page(1, 5, vec![movie(1, "A"), movie(2, "B")]),
            },
            &env,
        );

        assert_eq!(state.movies, vec![Movie::new(1, "A"), Movie::new(2, "B")]);
        assert_eq!(state.page, 1);
        assert_eq!(state.number_of_pages, 5);
        assert_eq!(state.search_query, "batman");
        assertions::assert_has_future_effect(&effects);
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let mut state = loaded("batman", 1, 5);
        let reducer = SearchReducer::new();
        let env = env();

        reducer.reduce(&mut state, SearchAction::Refresh, &env);
        let first = state.latest_request;
        reducer.reduce(&mut state, SearchAction::IncrementPage, &env);
        let before = state.clone();

        let effects = reducer.reduce(
            &mut state,
            SearchAction::FetchSucceeded {
                request_id: first,
                page: movie_page(1, 5, vec![movie(9, "Stale")]),
            },
            &env,
        );

        assert_eq!(state, before);
        assertions::assert_no_effects(&effects);
    }

    #[test]
    fn test_result_after_reset_is_discarded() {
        let mut state = MovieState::default();
        let reducer = SearchReducer::new();
        let env = env();

        reducer.reduce(&mut state, SearchAction::SetQuery { query: "alien".into() }, &env);
        let in_flight = state.latest_request;
        reducer.reduce(&mut state, SearchAction::Reset, &env);

        reducer.reduce(
            &mut state,
            SearchAction::FetchSucceeded {
                request_id: in_flight,
                page: movie_page(1, 2, vec![movie(348, "Alien")]),
            },
            &env,
        );

        assert!(state.is_idle());
        assert!(state.movies.is_empty());
    }

    #[test]
    fn test_failure_leaves_state_unchanged() {
        let mut state = loaded("batman", 2, 5);
        let reducer = SearchReducer::new();
        let env = env();

        reducer.reduce(&mut state, SearchAction::IncrementPage, &env);
        let before = state.clone();
        let request_id = state.latest_request;

        let effects = reducer.reduce(
            &mut state,
            SearchAction::FetchFailed {
                request_id,
                reason: "Request failed: connection refused".into(),
            },
            &env,
        );

        assert_eq!(state, before);
        assertions::assert_no_effects(&effects);
    }

    #[test]
    fn test_refresh_on_idle_state_does_not_fetch() {
        let catalog = MockMovieCatalog::new();
        let env = SearchEnvironment::new(catalog.clone(), InMemorySnapshotStore::new());
        let mut state = MovieState::default();

        let effects = SearchReducer::new().reduce(&mut state, SearchAction::Refresh, &env);

        assert_eq!(state.snapshot(), MovieState::default().snapshot());
        assert_eq!(assertions::count_future_effects(&effects), 1);
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn test_superseded_failure_is_ignored() {
        let mut state = loaded("batman", 1, 5);
        let reducer = SearchReducer::new();
        let env = env();

        reducer.reduce(&mut state, SearchAction::Refresh, &env);
        let first = state.latest_request;
        reducer.reduce(&mut state, SearchAction::IncrementPage, &env);
        let before = state.clone();

        let effects = reducer.reduce(
            &mut state,
            SearchAction::FetchFailed {
                request_id: first,
                reason: "Rate limited - too many requests".into(),
            },
            &env,
        );

        assert_eq!(state, before);
        assertions::assert_no_effects(&effects);
        assert!(!SearchAction::FetchFailed { request_id: first, reason: String::new() }.is_current(&state));
    }

    async fn run(effect: Effect<SearchAction>) -> Option<SearchAction> {
        match effect {
            Effect::Future(fut) => fut.await,
            other => unreachable!("expected a future effect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_out_of_order_persists_keep_newest_snapshot() {
        let snapshots = InMemorySnapshotStore::new();
        let env = SearchEnvironment::new(MockMovieCatalog::new(), snapshots.clone());
        let reducer = SearchReducer::new();
        let mut state = MovieState::default();

        reducer.reduce(&mut state, SearchAction::SetQuery { query: "batman".into() }, &env);
        let request_id = state.latest_request;
        let mut applied = reducer.reduce(
            &mut state,
            SearchAction::FetchSucceeded {
                request_id,
                page: movie_page(1, 5, vec![movie(268, "Batman")]),
            },
            &env,
        );
        let mut reset = reducer.reduce(&mut state, SearchAction::Reset, &env);

        // The reset write lands first, the older result write after it
        assert_eq!(run(reset.remove(0)).await, None);
        assert_eq!(run(applied.remove(0)).await, None);

        let cleared = MovieState::default().snapshot();
        assert_eq!(snapshots.saves(), vec![cleared.clone()]);
        assert_eq!(snapshots.load(), cleared);
    }

    #[tokio::test]
    async fn test_remount_restarts_write_ordering() {
        let snapshots = InMemorySnapshotStore::new();
        let env = SearchEnvironment::new(MockMovieCatalog::new(), snapshots.clone());
        let reducer = SearchReducer::new();

        let mut first = MovieState::default();
        reducer.reduce(&mut first, SearchAction::Reset, &env);
        let mut later = reducer.reduce(&mut first, SearchAction::Reset, &env);
        run(later.remove(0)).await;

        // A new mount starts counting requests from zero again
        let env = env.remount();
        let mut second = MovieState::default();
        let mut effects = reducer.reduce(&mut second, SearchAction::Reset, &env);
        run(effects.remove(0)).await;

        assert_eq!(snapshots.saves().len(), 2);
    }
}
