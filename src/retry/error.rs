//! Error types for retrier configuration.

/// Error returned by [`RetrierConfig::validate`](super::RetrierConfig::validate).
///
/// Waiting itself never fails; only a configuration can be rejected.
///
/// # Examples
///
/// ```rust
/// use ebbtide::{ConfigError, RetrierConfig};
///
/// let config = RetrierConfig::default().with_rate(0.0);
/// assert_eq!(config.validate(), Err(ConfigError::InvalidRate(0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The growth rate is not a finite number greater than zero.
    InvalidRate(f64),
    /// The jitter fraction is negative or not finite.
    InvalidJitter(f64),
}

impl ConfigError {
    /// Returns true if the growth rate was rejected.
    pub fn is_rate(&self) -> bool {
        matches!(self, Self::InvalidRate(_))
    }

    /// Returns true if the jitter fraction was rejected.
    pub fn is_jitter(&self) -> bool {
        matches!(self, Self::InvalidJitter(_))
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRate(rate) => {
                write!(f, "growth rate must be finite and positive, got {}", rate)
            }
            Self::InvalidJitter(jitter) => write!(
                f,
                "jitter fraction must be finite and non-negative, got {}",
                jitter
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
