//! # Ebbtide
//!
//! > *"The tide goes out before it comes back in"*
//!
//! Exponential backoff for retry loops, with jitter, attempt budgets and
//! cooperative cancellation.
//!
//! ## Quick Example
//!
//! ```rust
//! use ebbtide::Retry;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let mut remaining_failures = 2;
//! let result = Retry::new(
//!     || {
//!         let fail = remaining_failures > 0;
//!         remaining_failures -= 1;
//!         async move {
//!             if fail {
//!                 Err("connection reset")
//!             } else {
//!                 Ok("connected")
//!             }
//!         }
//!     },
//!     Duration::from_millis(1),
//! )
//! .backoff(Duration::from_millis(50))
//! .attempts(5)
//! .run()
//! .await;
//!
//! assert_eq!(result, Ok("connected"));
//! # });
//! ```
//!
//! See the [`retry`] module for the state machine underneath.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod retry;

// Re-exports
pub use retry::{
    ConfigError, NormalSource, Retrier, RetrierConfig, Retry, SeededNormal, ThreadNormal,
    DEFAULT_RATE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::retry::{NormalSource, Retrier, RetrierConfig, Retry};
}
