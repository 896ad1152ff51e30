//! Exponential backoff for retry loops.
//!
//! The core is [`Retrier`]: a small accumulator holding the current delay and
//! the remaining attempt budget. A retry loop calls [`Retrier::wait`] after
//! every failure; the wait grows the delay, applies jitter, caps it, spends an
//! attempt and sleeps, returning `false` when the loop should give up.
//!
//! - **Growth**: each wait multiplies the delay by `rate` (the golden ratio by
//!   default) until it reaches `ceiling`
//! - **Jitter**: optional normally distributed noise, drawn from an injected
//!   [`NormalSource`]
//! - **Budget**: an optional cap on total attempts
//! - **Cancellation**: a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!   aborts a wait promptly
//!
//! [`Retry`] is a thin driver that wires an async operation, a retry predicate,
//! a timeout and a token around a retrier.
//!
//! # Quick Start
//!
//! ```rust
//! use ebbtide::{Retrier, RetrierConfig};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let token = CancellationToken::new();
//! let mut retrier = Retrier::with_config(
//!     Duration::from_millis(1),
//!     Duration::from_millis(8),
//!     RetrierConfig::default().with_attempts(4).with_rate(2.0),
//! );
//!
//! let mut waits = 0;
//! while retrier.wait(&token).await {
//!     waits += 1;
//! }
//! assert_eq!(waits, 3);
//! # });
//! ```
//!
//! # Jitter
//!
//! With `jitter = j`, each delay `d` is replaced by a draw from a normal
//! distribution with mean `d` and standard deviation `j * d`, then capped at
//! `ceiling`. Draws below zero sleep for zero; draws below `floor` are raised
//! to `floor` once the sleep completes.
//!
//! ```rust
//! use ebbtide::{Retrier, RetrierConfig, SeededNormal};
//! use std::time::Duration;
//!
//! // Reproducible jitter for tests.
//! let retrier = Retrier::with_source(
//!     Duration::from_millis(100),
//!     Duration::from_secs(10),
//!     RetrierConfig::default().with_jitter(0.1),
//!     SeededNormal::new(7),
//! );
//! # let _ = retrier;
//! ```

mod config;
mod driver;
mod error;
mod retrier;
mod source;

pub use config::{RetrierConfig, DEFAULT_RATE};
pub use driver::Retry;
pub use error::ConfigError;
pub use retrier::Retrier;
pub use source::{NormalSource, SeededNormal, ThreadNormal};
