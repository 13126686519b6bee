//! Configuration for a filter instance.
//!
//! A [`FilterConfig`] carries the three tunable parameters of the filter. It
//! can be built directly, taken from `FilterConfig::default()`, or parsed from
//! the positional creation arguments a host passes when it instantiates a
//! filter:
//!
//! ```text
//! [iterations] [noise] [init]
//! ```
//!
//! Each argument is optional. Trailing arguments may be omitted.

use crate::constants::{
    DEFAULT_INIT_VALUE, DEFAULT_NOISE_COVARIANCE, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE,
    MIN_WINDOW_SIZE,
};

/// Filter parameters
///
/// # Example
/// ```
/// use kalmansmooth::config::FilterConfig;
///
/// let config = FilterConfig::from_creation_args(&["10", "0.2", "5"]);
/// assert_eq!(config.window_size, 10);
/// assert_eq!(config.noise_covariance, 0.2);
/// assert_eq!(config.init_value, 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Number of most recent measurements reprocessed on every update (1-100)
    pub window_size: usize,
    /// Measurement noise covariance, must be positive
    pub noise_covariance: f64,
    /// Seed of the recursive estimate and fill value of the history
    pub init_value: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            noise_covariance: DEFAULT_NOISE_COVARIANCE,
            init_value: DEFAULT_INIT_VALUE,
        }
    }
}

impl FilterConfig {
    /// Build a configuration from positional creation arguments
    ///
    /// Arguments are interpreted as (iterations, noise, init). An argument
    /// that is not a number leaves the default for its position in place.
    /// Arguments beyond the third are ignored.
    pub fn from_creation_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut config = Self::default();

        if args.len() > 3 {
            log::warn!(
                "kalman: ignoring {} extra creation argument(s)",
                args.len() - 3
            );
        }

        for (position, arg) in args.iter().take(3).enumerate() {
            let arg = arg.as_ref().trim();
            let value = match arg.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    log::warn!(
                        "kalman: creation argument {} ({:?}) is not a number, using default",
                        position + 1,
                        arg
                    );
                    continue;
                }
            };

            match position {
                0 => config.window_size = window_size_from_float(value),
                1 => config.noise_covariance = value,
                _ => config.init_value = value,
            }
        }

        config
    }

    /// Window size clamped to the supported range
    pub fn clamped_window_size(&self) -> usize {
        self.window_size.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE)
    }
}

/// Truncate a numeric message argument to a window size
///
/// Negative values saturate at zero so the caller's clamp reports them as
/// below the floor.
fn window_size_from_float(value: f64) -> usize {
    if value <= 0.0 { 0 } else { value as usize }
}
