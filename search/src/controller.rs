//! The mounted search: a [`Store`] running the [`SearchReducer`].

use crate::reducer::{SearchEnvironment, SearchReducer};
use crate::types::{MovieState, SearchAction};
use movie_search_core::snapshot::SearchSnapshot;
use movie_search_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Store type behind [`MovieSearch`]
pub type SearchStore = Store<MovieState, SearchAction, SearchEnvironment, SearchReducer>;

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// One mounted movie search.
///
/// Mounting reads the global store once and resumes a previous search if it
/// recorded a query. Every mutating method returns the [`EffectHandle`] of
/// the action it sent; waiting on it covers the fetch, the result being
/// applied, and the global store being updated.
///
/// # Example
///
/// ```ignore
/// let search = MovieSearch::mount(SearchEnvironment::new(catalog, session)).await?;
///
/// search.set_search_query("batman").await?.wait().await;
/// search.increment_page().await?.wait().await;
///
/// let state = search.state().await;
/// search.unmount(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MovieSearch {
    store: SearchStore,
}

impl MovieSearch {
    /// Mount with the default [`StoreConfig`]
    ///
    /// # Errors
    ///
    /// Fails only if the freshly created store rejects the initial refresh,
    /// which cannot happen before [`MovieSearch::unmount`].
    pub async fn mount(environment: SearchEnvironment) -> Result<Self, StoreError> {
        Self::mount_with_config(environment, StoreConfig::default()).await
    }

    /// Mount with a custom [`StoreConfig`]
    ///
    /// # Errors
    ///
    /// See [`MovieSearch::mount`].
    #[tracing::instrument(skip_all, name = "search_mount")]
    pub async fn mount_with_config(
        environment: SearchEnvironment,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let environment = environment.remount();
        let restored = environment.snapshots.load();
        let state = MovieState::initialize(restored);
        let resumed = !state.is_idle();

        if resumed {
            tracing::info!(
                query = %state.search_query,
                page = state.page,
                "Resuming previous search"
            );
        }

        let store = Store::with_config(state, SearchReducer::new(), environment, config);
        let search = Self { store };

        if resumed {
            search.store.send(SearchAction::Refresh).await?;
        }

        Ok(search)
    }

    /// Replace the query, going back to page 1
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after unmount.
    pub async fn set_search_query(&self, query: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.store
            .send(SearchAction::SetQuery { query: query.into() })
            .await
    }

    /// Go to the next page, unless on the last one
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after unmount.
    pub async fn increment_page(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(SearchAction::IncrementPage).await
    }

    /// Go to the previous page, unless on the first one
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after unmount.
    pub async fn decrement_page(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(SearchAction::DecrementPage).await
    }

    /// Fetch the current page again
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after unmount.
    pub async fn refresh(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(SearchAction::Refresh).await
    }

    /// Clear the search and ignore in-flight results
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after unmount.
    pub async fn reset(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(SearchAction::Reset).await
    }

    /// Copy of the current state
    pub async fn state(&self) -> MovieState {
        self.store.state(MovieState::clone).await
    }

    /// The persisted view of the current state
    pub async fn snapshot(&self) -> SearchSnapshot {
        self.store.state(MovieState::snapshot).await
    }

    /// Send an intent and wait for the next fetch outcome.
    ///
    /// Meant for callers that issue one intent at a time and only intents
    /// that fetch. With several requests in flight the outcome may answer an
    /// older one; check it with [`SearchAction::is_current`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no outcome before the timeout, which is
    ///   also what a no-op intent produces
    /// - [`StoreError::ShutdownInProgress`]: after unmount
    pub async fn send_and_wait_for_outcome(
        &self,
        action: SearchAction,
        timeout: Duration,
    ) -> Result<SearchAction, StoreError> {
        self.store
            .send_and_wait_for(action, SearchAction::is_fetch_outcome, timeout)
            .await
    }

    /// Fetch outcomes as they are fed back to the reducer
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchAction> {
        self.store.subscribe_actions()
    }

    /// Wait until no effect is running, including the mount refresh
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when the
    /// timeout expires.
    pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, async {
            while self.store.pending_effects() > 0 {
                tokio::time::sleep(SETTLE_POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)
    }

    /// Stop accepting actions and wait for running effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the timeout expires.
    pub async fn unmount(self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }

    /// [`MovieSearch::unmount`] with the configured shutdown timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when [`StoreConfig::default_shutdown_timeout`] expires.
    pub async fn close(self) -> Result<(), StoreError> {
        let timeout = self.store.config().default_shutdown_timeout;
        self.unmount(timeout).await
    }
}
