use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rolling_stats::Stats;

use crate::error::{FilterError, Result};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gaussian(mut self, std_dev: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { std_dev });
        self
    }

    pub fn with_impulse(mut self, probability: f64, amplitude: f64) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            probability,
            amplitude,
        });
        self
    }
}

/// Zero-mean Gaussian noise added to every sample
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub std_dev: f64,
}

/// Occasional outliers of fixed magnitude and random sign
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    /// Chance per sample of an impulse (0-1)
    pub probability: f64,
    pub amplitude: f64,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Return `truth` corrupted by the configured noise sources
///
/// # Errors
/// `InvalidParameter` for a negative or non-finite standard deviation or an
/// impulse probability outside 0-1.
pub fn apply_noise(truth: &[f64], config: &NoiseConfig) -> Result<Vec<f64>> {
    let mut rng = create_rng(config.seed);
    let mut signal = truth.to_vec();

    if let Some(ref additive) = config.additive {
        let normal = Normal::new(0.0, additive.std_dev).map_err(|e| {
            FilterError::InvalidParameter(format!(
                "noise std_dev {}: {}",
                additive.std_dev, e
            ))
        })?;
        for sample in signal.iter_mut() {
            *sample += normal.sample(&mut rng);
        }
    }

    if let Some(ref impulse) = config.impulse {
        if !(0.0..=1.0).contains(&impulse.probability) {
            return Err(FilterError::InvalidParameter(format!(
                "impulse probability {} outside 0-1",
                impulse.probability
            )));
        }
        for sample in signal.iter_mut() {
            if rng.random::<f64>() < impulse.probability {
                let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
                *sample += sign * impulse.amplitude;
            }
        }
    }

    Ok(signal)
}

/// Standard deviation of `noisy - truth`
pub fn residual_std_dev(noisy: &[f64], truth: &[f64]) -> f64 {
    let mut stats: Stats<f64> = Stats::new();
    for (a, b) in noisy.iter().zip(truth) {
        stats.update(a - b);
    }
    if stats.count < 2 {
        return 0.0;
    }
    stats.std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_reproducibility() {
        let truth = vec![1.0; 256];
        let config = NoiseConfig::default().with_seed(7).with_gaussian(0.3);
        let a = apply_noise(&truth, &config).unwrap();
        let b = apply_noise(&truth, &config).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, truth);
    }

    #[test]
    fn test_gaussian_spread() {
        let truth = vec![0.0; 20_000];
        let config = NoiseConfig::default().with_seed(42).with_gaussian(0.5);
        let noisy = apply_noise(&truth, &config).unwrap();
        let std = residual_std_dev(&noisy, &truth);
        assert!((std - 0.5).abs() < 0.02, "std {std}");
    }

    #[test]
    fn test_impulses_have_fixed_magnitude() {
        let truth = vec![0.0; 5_000];
        let config = NoiseConfig::default().with_seed(3).with_impulse(0.05, 4.0);
        let noisy = apply_noise(&truth, &config).unwrap();

        let hits: Vec<f64> = noisy.iter().copied().filter(|v| *v != 0.0).collect();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|v| v.abs() == 4.0));
        // ~250 expected
        assert!(hits.len() > 150 && hits.len() < 350, "{} impulses", hits.len());
    }

    #[test]
    fn test_no_noise_is_identity() {
        let truth = vec![1.0, 2.0, 3.0];
        assert_eq!(apply_noise(&truth, &NoiseConfig::default()).unwrap(), truth);
    }

    #[test]
    fn test_invalid_noise_rejected() {
        let truth = vec![0.0; 4];
        let config = NoiseConfig::default().with_gaussian(-1.0);
        assert!(apply_noise(&truth, &config).is_err());
        let config = NoiseConfig::default().with_impulse(1.5, 1.0);
        assert!(apply_noise(&truth, &config).is_err());
    }
}
