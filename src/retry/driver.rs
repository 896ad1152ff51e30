//! A retry loop built on [`Retrier`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::config::RetrierConfig;
use super::retrier::Retrier;

type Cond<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Run a fallible async operation until it succeeds or retrying stops.
///
/// Between failures the loop waits on a [`Retrier`] whose floor is `sleep`
/// and whose ceiling is `sleep` unless [`backoff`](Retry::backoff) raises it.
/// Every retry waits at least `sleep`, the first one included.
///
/// Retrying stops when:
/// - the operation succeeds (its value is returned),
/// - the [`cond`](Retry::cond) predicate rejects an error,
/// - the [`attempts`](Retry::attempts) budget is spent,
/// - the [`timeout`](Retry::timeout) deadline passes,
/// - or the [`token`](Retry::token) is cancelled.
///
/// In every stopping case except success the most recent error is returned
/// unchanged.
///
/// # Examples
///
/// ```rust
/// use ebbtide::Retry;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut calls = 0;
/// let result = Retry::new(
///     || {
///         calls += 1;
///         let n = calls;
///         async move { if n < 3 { Err("not yet") } else { Ok(n) } }
///     },
///     Duration::from_millis(1),
/// )
/// .attempts(5)
/// .run()
/// .await;
///
/// assert_eq!(result, Ok(3));
/// # });
/// ```
pub struct Retry<F, E> {
    operation: F,
    sleep: Duration,
    ceiling: Option<Duration>,
    attempts: Option<u32>,
    timeout: Option<Duration>,
    jitter: f64,
    cond: Option<Cond<E>>,
    token: Option<CancellationToken>,
}

impl<F, E> fmt::Debug for Retry<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("sleep", &self.sleep)
            .field("ceiling", &self.ceiling)
            .field("attempts", &self.attempts)
            .field("timeout", &self.timeout)
            .field("jitter", &self.jitter)
            .field("cond", &self.cond.is_some())
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl<F, Fut, T, E> Retry<F, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    /// Retry `operation`, sleeping at least `sleep` between attempts.
    pub fn new(operation: F, sleep: Duration) -> Self {
        Self {
            operation,
            sleep,
            ceiling: None,
            attempts: None,
            timeout: None,
            jitter: 0.0,
            cond: None,
            token: None,
        }
    }

    /// Call the operation at most `n` times in total.
    pub fn attempts(mut self, n: u32) -> Self {
        self.attempts = Some(n);
        self
    }

    /// Stop retrying once `timeout` has passed since [`run`](Retry::run)
    /// started. An attempt already in flight is not interrupted.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Back off exponentially from `sleep` up to `ceiling`.
    pub fn backoff(mut self, ceiling: Duration) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Randomize waits by the given fraction. See [`RetrierConfig::jitter`].
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Only retry errors for which `cond` returns true.
    pub fn cond<P>(mut self, cond: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.cond = Some(Box::new(cond));
        self
    }

    /// Stop retrying when `token` is cancelled.
    pub fn token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Drive the loop to completion.
    pub async fn run(mut self) -> Result<T, E> {
        let config = RetrierConfig {
            attempts: self.attempts,
            jitter: self.jitter,
            ..RetrierConfig::default()
        };
        let ceiling = self.ceiling.unwrap_or(self.sleep);
        let mut retrier = Retrier::with_config(self.sleep, ceiling, config);
        let token = self.token.take().unwrap_or_default();
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let error = match (self.operation)().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if let Some(cond) = &self.cond {
                if !cond(&error) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("error is not retryable");
                    return Err(error);
                }
            }

            let proceed = match deadline {
                Some(deadline) => {
                    tokio::select! {
                        biased;
                        _ = tokio::time::sleep_until(deadline) => false,
                        proceed = pause(&mut retrier, &token, self.sleep) => proceed,
                    }
                }
                None => pause(&mut retrier, &token, self.sleep).await,
            };

            if !proceed {
                #[cfg(feature = "tracing")]
                tracing::debug!(delay = ?retrier.delay(), "giving up");
                return Err(error);
            }
        }
    }
}

/// Wait on `retrier`, sleeping a full `sleep` on the first retry.
///
/// A fresh retrier returns from its first wait without delay; that wait still
/// spends an attempt and raises the delay to the floor.
async fn pause(retrier: &mut Retrier, token: &CancellationToken, sleep: Duration) -> bool {
    let first = retrier.delay().is_zero();
    if !retrier.wait(token).await {
        return false;
    }

    if first && !sleep.is_zero() {
        tokio::select! {
            biased;
            _ = token.cancelled() => return false,
            _ = tokio::time::sleep(sleep) => {}
        }
    }
    true
}
