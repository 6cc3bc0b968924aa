//! Domain types for the movie search state machine.

use movie_search_core::movie::{Movie, MoviePage};
use movie_search_core::snapshot::SearchSnapshot;
use serde::{Deserialize, Serialize};

/// Monotonic tag of an issued fetch.
///
/// Every transition that issues a fetch (or invalidates the in-flight one)
/// advances the tag; a fetch result is applied only if it carries the
/// latest tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Creates a `RequestId` from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The tag following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local state of one mounted search.
///
/// `page <= number_of_pages` holds whenever `number_of_pages > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieState {
    /// Movies of the current page
    pub movies: Vec<Movie>,
    /// Current query; empty means idle
    pub search_query: String,
    /// 1-based current page
    pub page: u32,
    /// Total pages for the query, 0 until the first result arrives
    pub number_of_pages: u32,
    /// Tag of the most recently issued fetch
    pub latest_request: RequestId,
}

impl Default for MovieState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            search_query: String::new(),
            page: 1,
            number_of_pages: 0,
            latest_request: RequestId::default(),
        }
    }
}

impl MovieState {
    /// Initial state for a newly mounted search.
    ///
    /// A snapshot that records a previous query is adopted as-is; anything
    /// else yields the empty default, whatever its other fields hold.
    #[must_use]
    pub fn initialize(snapshot: SearchSnapshot) -> Self {
        if !snapshot.has_query() {
            return Self::default();
        }

        Self {
            movies: snapshot.movies,
            search_query: snapshot.search_query,
            page: snapshot.page,
            number_of_pages: snapshot.number_of_pages,
            latest_request: RequestId::default(),
        }
    }

    /// The persisted view of this state
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            movies: self.movies.clone(),
            search_query: self.search_query.clone(),
            page: self.page,
            number_of_pages: self.number_of_pages,
        }
    }

    /// Whether no query is set
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.search_query.is_empty()
    }

    /// Whether moving forward is allowed.
    ///
    /// Only the last known page blocks. Before the first result arrives the
    /// page count is 0 and paging forward is allowed.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.number_of_pages == 0 || self.page < self.number_of_pages
    }

    /// Whether a previous page exists
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Back to the empty default, keeping the request counter
    pub fn clear(&mut self) {
        *self = Self {
            latest_request: self.latest_request,
            ..Self::default()
        };
    }

    /// Advance and return the request tag
    pub fn issue_request(&mut self) -> RequestId {
        self.latest_request = self.latest_request.next();
        self.latest_request
    }
}

/// Inputs to the search reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchAction {
    // ========== User intents ==========
    /// Replace the query; resets to page 1 and discards current results
    SetQuery {
        /// New query (may be empty)
        query: String,
    },
    /// Move to the next page, unless already on the last one
    IncrementPage,
    /// Move to the previous page, unless already on the first one
    DecrementPage,
    /// Fetch the current (query, page) again
    Refresh,
    /// Clear everything and stop listening to in-flight requests
    Reset,

    // ========== Fetch outcomes ==========
    /// A fetch completed
    FetchSucceeded {
        /// Tag of the request this answers
        request_id: RequestId,
        /// Response page
        page: MoviePage,
    },
    /// A fetch failed
    FetchFailed {
        /// Tag of the request this answers
        request_id: RequestId,
        /// Error description
        reason: String,
    },
}

impl SearchAction {
    /// Request tag of a fetch outcome; `None` for user intents
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::FetchSucceeded { request_id, .. } | Self::FetchFailed { request_id, .. } => {
                Some(*request_id)
            },
            _ => None,
        }
    }

    /// Whether this is the outcome of a fetch
    #[must_use]
    pub const fn is_fetch_outcome(&self) -> bool {
        self.request_id().is_some()
    }

    /// Whether a fetch outcome still answers the latest request of `state`.
    /// User intents are always current.
    #[must_use]
    pub fn is_current(&self, state: &MovieState) -> bool {
        self.request_id()
            .is_none_or(|request_id| request_id == state.latest_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = MovieState::default();
        assert!(state.movies.is_empty());
        assert!(state.is_idle());
        assert_eq!(state.page, 1);
        assert_eq!(state.number_of_pages, 0);
    }

    #[test]
    fn test_initialize_adopts_snapshot_with_query() {
        let snapshot = SearchSnapshot {
            movies: vec![Movie::new(438_631, "Dune")],
            search_query: "dune".to_string(),
            page: 2,
            number_of_pages: 3,
        };

        let state = MovieState::initialize(snapshot.clone());
        assert_eq!(state.snapshot(), snapshot);
    }

    #[test]
    fn test_initialize_ignores_snapshot_without_query() {
        let snapshot = SearchSnapshot {
            movies: vec![Movie::new(1, "Leftover")],
            search_query: String::new(),
            page: 7,
            number_of_pages: 9,
        };

        assert_eq!(MovieState::initialize(snapshot), MovieState::default());
    }

    #[test]
    fn test_clear_keeps_request_counter() {
        let mut state = MovieState::default();
        state.search_query = "alien".into();
        let id = state.issue_request();

        state.clear();
        assert!(state.is_idle());
        assert_eq!(state.latest_request, id);
    }

    #[test]
    fn test_request_ids_increase() {
        let mut state = MovieState::default();
        let first = state.issue_request();
        let second = state.issue_request();
        assert!(second > first);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_outcome_currency() {
        let mut state = MovieState::default();
        let first = state.issue_request();
        let outcome = SearchAction::FetchFailed {
            request_id: first,
            reason: "Unauthorized - invalid credentials".into(),
        };

        assert!(outcome.is_fetch_outcome());
        assert!(outcome.is_current(&state));

        state.issue_request();
        assert!(!outcome.is_current(&state));
        assert!(SearchAction::Refresh.is_current(&state));
        assert!(!SearchAction::Refresh.is_fetch_outcome());
    }
}
