//! # Movie Search Core
//!
//! Core traits and domain types for the movie search feature.
//!
//! The feature is built as a reducer-driven state machine:
//!
//! - **State**: the search results, query and pagination of one mounted search
//! - **Action**: every input to the reducer (user intents and fetch outcomes)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of a side effect, executed by the runtime
//! - **Environment**: the injected collaborators ([`MovieCatalog`], [`SnapshotStore`])
//!
//! ## Example
//!
//! ```ignore
//! use movie_search_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for SearchReducer {
//!     type State = MovieState;
//!     type Action = SearchAction;
//!     type Environment = SearchEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut MovieState,
//!         action: SearchAction,
//!         env: &SearchEnvironment,
//!     ) -> SmallVec<[Effect<SearchAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::NaiveDate;
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub use catalog::{CatalogError, MovieCatalog};
pub use movie::{Movie, MoviePage};
pub use snapshot::{SearchSnapshot, SnapshotStore};

/// Movie catalog abstraction (the external search API)
pub mod catalog;

/// Movie records and result pages
pub mod movie;

/// Global store snapshot abstraction
pub mod snapshot;

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SearchReducer {
    ///     type State = MovieState;
    ///     type Action = SearchAction;
    ///     type Environment = SearchEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut MovieState,
    ///         action: SearchAction,
    ///         env: &SearchEnvironment,
    ///     ) -> SmallVec<[Effect<SearchAction>; 4]> {
    ///         match action {
    ///             SearchAction::DecrementPage if state.page <= 1 => smallvec![Effect::None],
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Decides whether the action applies
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most reducers return one or two effects, so the result is a
        /// `SmallVec` that stays on the stack in the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution), returned from reducers.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}
