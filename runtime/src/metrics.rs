//! Metric descriptions for the store runtime and the search feature.
//!
//! Metrics are recorded through the `metrics` facade. Nothing is exported
//! unless the embedding application installs a recorder; calling
//! [`describe_metrics`] after installing one attaches help text to every
//! metric name used in this workspace.

use metrics::{describe_counter, describe_histogram, Unit};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, histogram};

/// Fetch requests issued by the search reducer
pub const SEARCH_FETCH_ISSUED: &str = "search.fetch.issued";

/// Fetch results discarded because a newer request was issued
pub const SEARCH_FETCH_STALE: &str = "search.fetch.stale_discarded";

/// Fetch requests that failed
pub const SEARCH_FETCH_FAILED: &str = "search.fetch.failed";

/// Register descriptions for every metric recorded by this workspace.
pub fn describe_metrics() {
    // Store
    describe_counter!(
        "store.commands.total",
        "Total number of actions sent to stores"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        Unit::Seconds,
        "Time taken to execute reducers"
    );
    describe_counter!(
        "store.effects.executed",
        "Effects executed, labelled by effect type"
    );
    describe_counter!("store.shutdown.initiated", "Graceful shutdowns started");
    describe_counter!("store.shutdown.completed", "Graceful shutdowns that drained all effects");
    describe_counter!("store.shutdown.timeout", "Graceful shutdowns that timed out");
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );

    // Search
    describe_counter!(SEARCH_FETCH_ISSUED, "Movie search requests issued");
    describe_counter!(
        SEARCH_FETCH_STALE,
        "Movie search responses discarded because a newer request superseded them"
    );
    describe_counter!(SEARCH_FETCH_FAILED, "Movie search requests that failed");
}
