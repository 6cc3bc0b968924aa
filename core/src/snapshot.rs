//! Global store access for the search feature.
//!
//! The global store outlives a single mounted search: it holds the last
//! search results so a remounted search can resume where the previous one
//! stopped. The search reads it once when mounting and writes it whenever the
//! persisted fields change.

use crate::movie::Movie;
use serde::{Deserialize, Serialize};

/// The persisted shape of a search: results, query, and pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    /// Movies of the current page
    pub movies: Vec<Movie>,
    /// Query the movies were fetched for
    pub search_query: String,
    /// 1-based current page (0 only for a never-written store)
    pub page: u32,
    /// Total pages for the query
    pub number_of_pages: u32,
}

impl SearchSnapshot {
    /// Whether the snapshot records a previous search
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.search_query.is_empty()
    }
}

/// Read/write channel to the global store.
///
/// Implementations must be cheap and non-blocking: `save` is called from
/// effects after every applied transition.
pub trait SnapshotStore: Send + Sync {
    /// Read the last persisted snapshot (default when nothing was saved)
    fn load(&self) -> SearchSnapshot;

    /// Replace the persisted snapshot
    fn save(&self, snapshot: SearchSnapshot);
}
