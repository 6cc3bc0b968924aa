//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block body
///
/// The body is wrapped in `async move`, so it takes ownership of everything
/// it captures. It must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use movie_search_core::async_effect;
///
/// let catalog = Arc::clone(&env.catalog);
/// async_effect! {
///     match catalog.search_movies(&query, page).await {
///         Ok(page) => Some(SearchAction::FetchSucceeded { request_id, page }),
///         Err(error) => Some(SearchAction::FetchFailed { request_id, reason: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
