//! Retrier configuration.

use super::error::ConfigError;

/// Growth rate used when none is configured: the golden ratio.
///
/// It scales more calmly than doubling while still backing off quickly.
pub const DEFAULT_RATE: f64 = 1.618_033_988_749_895;

/// Tunables for a [`Retrier`](super::Retrier).
///
/// Configs are plain data. Start from [`RetrierConfig::default`] and override
/// what you need; nothing changes after the retrier is built.
///
/// # Attempt budget
///
/// `attempts` counts *total* attempts of the guarded operation. With
/// `Some(k)`, [`Retrier::wait`](super::Retrier::wait) returns `true` `k - 1`
/// times and then `false`, so a driver loop calls the operation `k` times.
/// `Some(0)` behaves like `Some(1)`. `None` never runs out.
///
/// # Examples
///
/// ```rust
/// use ebbtide::RetrierConfig;
///
/// let config = RetrierConfig::default()
///     .with_attempts(5)
///     .with_rate(2.0)
///     .with_jitter(0.1);
///
/// assert_eq!(config.attempts, Some(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetrierConfig {
    /// Total attempt budget. `None` is unlimited.
    pub attempts: Option<u32>,
    /// Multiplier applied to the delay on every wait.
    pub rate: f64,
    /// Standard deviation of the jitter, as a fraction of the delay.
    ///
    /// `0.1` draws each delay from a normal distribution whose standard
    /// deviation is 10% of the delay. `0.0` disables jitter.
    pub jitter: f64,
}

impl Default for RetrierConfig {
    fn default() -> Self {
        Self {
            attempts: None,
            rate: DEFAULT_RATE,
            jitter: 0.0,
        }
    }
}

impl RetrierConfig {
    /// Limit the total number of attempts.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Remove any attempt limit.
    pub fn unlimited(mut self) -> Self {
        self.attempts = None;
        self
    }

    /// Override the growth rate.
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Set the jitter fraction.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Check that `rate` and `jitter` are usable.
    ///
    /// A rate at or below `1.0` is accepted: it simply never grows the delay
    /// past the floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(ConfigError::InvalidRate(self.rate));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(ConfigError::InvalidJitter(self.jitter));
        }
        Ok(())
    }
}
