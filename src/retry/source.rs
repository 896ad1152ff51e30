//! Random sources for jitter.
//!
//! A [`Retrier`](super::Retrier) never reaches for a global generator. It owns a
//! [`NormalSource`] and asks it for standard-normal samples, which makes jitter
//! reproducible in tests: supply a [`SeededNormal`] or your own scripted source
//! and the post-jitter delays are exact.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// A source of samples from the standard normal distribution `N(0, 1)`.
///
/// The retrier scales each sample by `jitter * delay` and shifts it by the
/// delay, so implementations only ever deal with the unit distribution.
///
/// # Examples
///
/// ```rust
/// use ebbtide::NormalSource;
///
/// /// Always draws one standard deviation above the mean.
/// struct OneSigma;
///
/// impl NormalSource for OneSigma {
///     fn sample_standard_normal(&mut self) -> f64 {
///         1.0
///     }
/// }
///
/// assert_eq!(OneSigma.sample_standard_normal(), 1.0);
/// ```
pub trait NormalSource {
    /// Draw one sample from `N(0, 1)`.
    fn sample_standard_normal(&mut self) -> f64;
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    fn sample_standard_normal(&mut self) -> f64 {
        (**self).sample_standard_normal()
    }
}

impl<S: NormalSource + ?Sized> NormalSource for Box<S> {
    fn sample_standard_normal(&mut self) -> f64 {
        (**self).sample_standard_normal()
    }
}

/// The default source, backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNormal;

impl NormalSource for ThreadNormal {
    fn sample_standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut rand::rng())
    }
}

/// A deterministic source seeded from a `u64`.
///
/// Two sources built from the same seed produce the same sequence.
///
/// ```rust
/// use ebbtide::{NormalSource, SeededNormal};
///
/// let mut a = SeededNormal::new(7);
/// let mut b = SeededNormal::new(7);
/// assert_eq!(a.sample_standard_normal(), b.sample_standard_normal());
/// ```
#[derive(Debug, Clone)]
pub struct SeededNormal {
    rng: StdRng,
}

impl SeededNormal {
    /// Create a source from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NormalSource for SeededNormal {
    fn sample_standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = SeededNormal::new(42);
        let mut b = SeededNormal::new(42);

        for _ in 0..16 {
            assert_eq!(a.sample_standard_normal(), b.sample_standard_normal());
        }
    }

    #[test]
    fn test_seeded_samples_look_standard() {
        let mut source = SeededNormal::new(1);
        let samples: Vec<f64> = (0..10_000)
            .map(|_| source.sample_standard_normal())
            .collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "mean {} too far from 0", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {} too far from 1", var);
    }

    #[test]
    fn test_thread_source_is_finite() {
        let mut source = ThreadNormal;
        for _ in 0..100 {
            assert!(source.sample_standard_normal().is_finite());
        }
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut boxed: Box<dyn NormalSource> = Box::new(SeededNormal::new(9));
        let mut plain = SeededNormal::new(9);
        assert_eq!(
            boxed.sample_standard_normal(),
            plain.sample_standard_normal()
        );
    }
}
