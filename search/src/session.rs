//! Session-scoped global store.

use movie_search_core::snapshot::{SearchSnapshot, SnapshotStore};
use std::sync::Arc;
use tokio::sync::watch;

/// In-memory global store shared by every search mounted in this process.
///
/// Clones share the same cell. Observers get every saved snapshot through
/// [`SessionStore::watch`].
///
/// # Example
///
/// ```
/// use movie_search::SessionStore;
/// use movie_search_core::{SearchSnapshot, SnapshotStore};
///
/// let session = SessionStore::new();
/// let observer = session.watch();
///
/// session.save(SearchSnapshot {
///     search_query: "alien".into(),
///     page: 1,
///     ..SearchSnapshot::default()
/// });
///
/// assert_eq!(session.load().search_query, "alien");
/// assert_eq!(observer.borrow().search_query, "alien");
/// ```
#[derive(Clone, Debug)]
pub struct SessionStore {
    cell: Arc<watch::Sender<SearchSnapshot>>,
}

impl SessionStore {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot(SearchSnapshot::default())
    }

    /// Create a session resuming a previous search
    #[must_use]
    pub fn with_snapshot(snapshot: SearchSnapshot) -> Self {
        let (cell, _) = watch::channel(snapshot);
        Self { cell: Arc::new(cell) }
    }

    /// Observe saved snapshots
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SearchSnapshot> {
        self.cell.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for SessionStore {
    fn load(&self) -> SearchSnapshot {
        self.cell.borrow().clone()
    }

    fn save(&self, snapshot: SearchSnapshot) {
        tracing::trace!(
            query = %snapshot.search_query,
            page = snapshot.page,
            movies = snapshot.movies.len(),
            "Saving search snapshot"
        );
        self.cell.send_replace(snapshot);
    }
}
