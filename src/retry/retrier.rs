//! The backoff state machine.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::config::RetrierConfig;
use super::source::{NormalSource, ThreadNormal};

/// Exponentially backing off waits between attempts of a fallible operation.
///
/// A `Retrier` holds the current delay and the remaining attempt budget. Each
/// call to [`wait`](Retrier::wait) grows the delay by the configured rate,
/// perturbs it with jitter, caps it at `ceiling`, spends one attempt, and then
/// sleeps unless the cancellation token fires first.
///
/// The delay starts at zero, so the very first wait returns immediately.
/// After every completed sleep the delay is raised to at least `floor`, which
/// is what seeds growth for the following waits. A zero floor with no jitter
/// therefore never backs off.
///
/// `floor <= ceiling` is the caller's responsibility. With `floor > ceiling`
/// sleeps are still capped at `ceiling`, but the stored delay is raised back
/// to `floor` after each one; nothing is corrected silently.
///
/// A retrier belongs to one retry sequence. It is `&mut self` throughout, so
/// sharing one between concurrent loops requires external locking and is not
/// intended.
///
/// # Examples
///
/// ```rust
/// use ebbtide::{Retrier, RetrierConfig};
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let token = CancellationToken::new();
/// let mut retrier = Retrier::with_config(
///     Duration::from_millis(1),
///     Duration::from_millis(4),
///     RetrierConfig::default().with_attempts(3),
/// );
///
/// let mut calls = 0;
/// loop {
///     calls += 1;
///     let failed = true; // run the operation here
///     if !failed || !retrier.wait(&token).await {
///         break;
///     }
/// }
/// assert_eq!(calls, 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Retrier<S = ThreadNormal> {
    remaining: Option<u32>,
    delay: Duration,
    floor: Duration,
    ceiling: Duration,
    rate: f64,
    jitter: f64,
    source: S,
}

impl Retrier {
    /// Create a retrier backing off from `floor` to `ceiling` with default
    /// settings: unlimited attempts, golden-ratio growth, no jitter.
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self::with_config(floor, ceiling, RetrierConfig::default())
    }

    /// Create a retrier with explicit settings, drawing jitter from the
    /// thread-local generator.
    pub fn with_config(floor: Duration, ceiling: Duration, config: RetrierConfig) -> Self {
        Self::with_source(floor, ceiling, config, ThreadNormal)
    }
}

impl<S: NormalSource> Retrier<S> {
    /// Create a retrier that draws jitter from `source`.
    ///
    /// ```rust
    /// use ebbtide::{Retrier, RetrierConfig, SeededNormal};
    /// use std::time::Duration;
    ///
    /// let retrier = Retrier::with_source(
    ///     Duration::from_millis(10),
    ///     Duration::from_secs(1),
    ///     RetrierConfig::default().with_jitter(0.2),
    ///     SeededNormal::new(42),
    /// );
    /// assert_eq!(retrier.delay(), Duration::ZERO);
    /// ```
    pub fn with_source(
        floor: Duration,
        ceiling: Duration,
        config: RetrierConfig,
        source: S,
    ) -> Self {
        Self {
            remaining: config.attempts,
            delay: Duration::ZERO,
            floor,
            ceiling,
            rate: config.rate,
            jitter: config.jitter,
            source,
        }
    }

    /// Wait before the next attempt.
    ///
    /// Returns `true` once the backoff delay has elapsed and the caller should
    /// try again. Returns `false` without sleeping when the token is already
    /// cancelled or the attempt budget is spent, and returns `false` as soon
    /// as the token is cancelled mid-sleep.
    ///
    /// A cancelled token is checked before any state changes. Once the sleep
    /// has started, cancellation leaves the state exactly as it was when the
    /// sleep began.
    pub async fn wait(&mut self, token: &CancellationToken) -> bool {
        if token.is_cancelled() {
            return false;
        }

        let Some(delay) = self.advance() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(delay = ?self.delay, "attempt budget exhausted");
            return false;
        };

        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(?delay, "backoff wait cancelled");
                    return false;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if self.delay < self.floor {
            self.delay = self.floor;
        }
        true
    }

    /// Restart the backoff curve from zero delay.
    ///
    /// The attempt budget is left as it is.
    pub fn reset(&mut self) {
        self.delay = Duration::ZERO;
    }

    /// The delay most recently computed (or the floor it was raised to).
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Attempts left in the budget, or `None` when unlimited.
    pub fn remaining_attempts(&self) -> Option<u32> {
        self.remaining
    }

    /// The minimum delay.
    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// The maximum delay.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// The growth rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The jitter fraction.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Grow, jitter and cap the delay, then spend one attempt.
    ///
    /// Returns the delay to sleep, or `None` when the budget is spent.
    fn advance(&mut self) -> Option<Duration> {
        let mut secs = self.delay.as_secs_f64();
        if self.delay < self.ceiling {
            secs *= self.rate;
        }

        if self.jitter != 0.0 {
            secs += self.source.sample_standard_normal() * self.jitter * secs;
        }

        self.delay = if secs >= self.ceiling.as_secs_f64() {
            self.ceiling
        } else {
            // Negative or NaN jitter results become an immediate retry.
            Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(self.ceiling)
        };

        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining <= 1 {
                return None;
            }
            *remaining -= 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            delay = ?self.delay,
            remaining = ?self.remaining,
            "computed backoff delay"
        );

        Some(self.delay)
    }
}
