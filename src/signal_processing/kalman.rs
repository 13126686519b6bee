//! Fixed-window scalar Kalman filter
//!
//! Every call to [`KalmanFilter::update`] stores the measurement in a circular
//! window and then re-derives the estimate from scratch: the recursion starts
//! at `init_value` with unit error covariance and folds in every value of the
//! window, oldest first. Nothing but the window itself is carried between
//! calls, so the cost is O(window size) per sample.
//!
//! While calibration is active, measurements go to a [`StreamAnalyzer`]
//! instead and no estimate is produced. Leaving calibration re-seeds
//! `init_value` from the observed mean and `noise_covariance` from the mean
//! absolute sample-to-sample delta.
//!
//! All mutation goes through `&mut self`. A filter shared between threads
//! must be wrapped in a lock by its owner.

use crate::config::FilterConfig;
use crate::constants::{
    DEFAULT_NOISE_COVARIANCE, INITIAL_ERROR_COVARIANCE, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
};
use crate::error::{FilterError, Result};
use crate::signal_processing::history::WindowHistory;
use crate::signal_processing::stream_analyzer::{AnalyzerSnapshot, StreamAnalyzer};

/// Result of one filter update
///
/// `accuracy` currently repeats `estimate`; no separate accuracy metric is
/// computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutput {
    pub estimate: f64,
    pub accuracy: f64,
}

/// Filter operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Measurements are filtered and produce output
    Normal,
    /// Measurements feed the analyzer and produce no output
    Calibrating,
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    noise_covariance: f64,
    init_value: f64,
    history: WindowHistory,
    mode: FilterMode,
    analyzer: StreamAnalyzer,
}

impl KalmanFilter {
    /// Create a filter from `config`
    ///
    /// Out-of-range values are corrected rather than rejected: the window
    /// size is clamped to 1-100 and a non-positive noise covariance is
    /// replaced by the default.
    pub fn new(config: &FilterConfig) -> Self {
        let window_size = config.clamped_window_size();
        if window_size != config.window_size {
            log::warn!(
                "kalman: window size {} out of range, using {}",
                config.window_size,
                window_size
            );
        }

        let noise_covariance = if is_valid_noise(config.noise_covariance) {
            config.noise_covariance
        } else {
            log::warn!(
                "kalman: noise covariance {} must be positive, using {}",
                config.noise_covariance,
                DEFAULT_NOISE_COVARIANCE
            );
            DEFAULT_NOISE_COVARIANCE
        };

        log::info!(
            "kalman filter initialized with {} iterations, {} noise covariance, and an init value of {}",
            window_size,
            noise_covariance,
            config.init_value
        );

        Self {
            noise_covariance,
            init_value: config.init_value,
            history: WindowHistory::new(window_size, config.init_value),
            mode: FilterMode::Normal,
            analyzer: StreamAnalyzer::new(),
        }
    }

    /// Process one measurement
    ///
    /// Returns `None` while calibrating.
    pub fn update(&mut self, measurement: f64) -> Option<FilterOutput> {
        if self.mode == FilterMode::Calibrating {
            self.analyzer.observe(measurement);
            return None;
        }

        self.history.push(measurement);
        let estimate = self.estimate();

        Some(FilterOutput {
            estimate,
            accuracy: estimate,
        })
    }

    /// Run the recursion over the current window without storing anything
    pub fn estimate(&self) -> f64 {
        let mut error_covariance = INITIAL_ERROR_COVARIANCE;
        let mut state_estimate = self.init_value;

        for observation in self.history.iter() {
            let gain = error_covariance / (error_covariance + self.noise_covariance);
            state_estimate += gain * (observation - state_estimate);
            error_covariance *= 1.0 - gain;
        }

        state_estimate
    }

    /// Set the measurement noise covariance
    ///
    /// # Errors
    /// `InvalidParameter` if `value` is not a positive finite number; the
    /// previous covariance is kept.
    pub fn set_noise_covariance(&mut self, value: f64) -> Result<()> {
        if !is_valid_noise(value) {
            log::error!("kalman: noise cannot be 0 or less");
            return Err(FilterError::InvalidParameter(format!(
                "noise covariance must be positive, got {}",
                value
            )));
        }

        log::info!("kalman: noise covariance set to {}", value);
        self.noise_covariance = value;
        Ok(())
    }

    /// Set the seed of the recursive estimate
    ///
    /// The stored window is left untouched.
    pub fn set_init_value(&mut self, value: f64) {
        log::info!("kalman: initial val set to {}", value);
        self.init_value = value;
    }

    /// Set the window size, clamped to 1-100
    ///
    /// The clamped size is applied even when an error is returned. Stored
    /// measurements are kept; see [`WindowHistory::resize`].
    ///
    /// # Errors
    /// `InvalidParameter` when `value` had to be clamped.
    pub fn set_window_size(&mut self, value: i64) -> Result<usize> {
        let (size, clamp_error) = if value < MIN_WINDOW_SIZE as i64 {
            log::error!("kalman: minimum is {} iteration", MIN_WINDOW_SIZE);
            (
                MIN_WINDOW_SIZE,
                Some(FilterError::InvalidParameter(format!(
                    "window size {} is below the minimum of {}",
                    value, MIN_WINDOW_SIZE
                ))),
            )
        } else if value > MAX_WINDOW_SIZE as i64 {
            log::error!(
                "kalman: exceeded maximum of {} iterations",
                MAX_WINDOW_SIZE
            );
            (
                MAX_WINDOW_SIZE,
                Some(FilterError::InvalidParameter(format!(
                    "window size {} exceeds the maximum of {}",
                    value, MAX_WINDOW_SIZE
                ))),
            )
        } else {
            (value as usize, None)
        };

        log::info!("kalman: number of iterations set to {}", size);
        self.history.resize(size);

        match clamp_error {
            Some(err) => Err(err),
            None => Ok(size),
        }
    }

    /// Enter or leave calibration mode
    ///
    /// Entering discards any previous statistics. Leaving applies the
    /// collected statistics and returns them; leaving when not calibrating
    /// does nothing and returns `Ok(None)`.
    ///
    /// # Errors
    /// `InsufficientData` when leaving without a single observation. The
    /// filter is back in normal mode with its parameters unchanged and the
    /// history refilled with the current `init_value`.
    pub fn set_calibration(&mut self, enable: bool) -> Result<Option<AnalyzerSnapshot>> {
        if enable {
            self.analyzer.reset();
            self.mode = FilterMode::Calibrating;
            log::info!("kalman: analyzing input for optimal coefficients");
            return Ok(None);
        }

        if self.mode == FilterMode::Normal {
            log::debug!("kalman: analyze mode already off");
            return Ok(None);
        }

        self.mode = FilterMode::Normal;
        let stats = match self.analyzer.snapshot() {
            Ok(stats) => stats,
            Err(err) => {
                log::warn!("kalman: analyze mode off without any input, keeping parameters");
                self.history.fill(self.init_value);
                return Err(err);
            }
        };

        self.init_value = stats.mean;
        if is_valid_noise(stats.mean_absolute_delta) {
            self.noise_covariance = stats.mean_absolute_delta;
        } else {
            log::warn!(
                "kalman: measured noise {} is not positive, keeping noise covariance {}",
                stats.mean_absolute_delta,
                self.noise_covariance
            );
        }
        self.history.fill(self.init_value);

        log::info!(
            "kalman: analyze mode off. mean: {}, standard deviation: {}, noise covariance: {}",
            self.init_value,
            stats.standard_deviation,
            self.noise_covariance
        );

        Ok(Some(stats))
    }

    pub fn window_size(&self) -> usize {
        self.history.window_size()
    }

    pub fn noise_covariance(&self) -> f64 {
        self.noise_covariance
    }

    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn is_calibrating(&self) -> bool {
        self.mode == FilterMode::Calibrating
    }

    pub fn history(&self) -> &WindowHistory {
        &self.history
    }

    /// Samples observed since calibration was last entered
    pub fn calibration_samples(&self) -> u64 {
        self.analyzer.sample_count()
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

fn is_valid_noise(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config(window_size: usize, noise_covariance: f64, init_value: f64) -> FilterConfig {
        FilterConfig {
            window_size,
            noise_covariance,
            init_value,
        }
    }

    #[test]
    fn test_converged_on_construction() {
        let mut filter = KalmanFilter::new(&config(10, 0.2, 5.0));
        let out = filter.update(5.0).unwrap();
        assert_eq!(out.estimate, 5.0);
        assert_eq!(out.accuracy, 5.0);
    }

    #[test]
    fn test_single_step_gain() {
        // Window of one: K = 1 / (1 + R)
        let mut filter = KalmanFilter::new(&config(1, 1.0, 0.0));
        let out = filter.update(10.0).unwrap();
        assert_abs_diff_eq!(out.estimate, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_window_closed_form() {
        let window = 30;
        let noise = 0.5;
        let mut filter = KalmanFilter::new(&config(window, noise, 0.0));
        let mut last = 0.0;
        for _ in 0..window {
            last = filter.update(4.0).unwrap().estimate;
        }
        let expected = (window as f64 * 4.0) / (noise + window as f64);
        assert_abs_diff_eq!(last, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_estimate_does_not_advance_state() {
        let mut filter = KalmanFilter::default();
        filter.update(1.0);
        let index = filter.history().write_index();
        let a = filter.estimate();
        let b = filter.estimate();
        assert_eq!(a, b);
        assert_eq!(filter.history().write_index(), index);
    }

    #[test]
    fn test_window_values_weighted_equally() {
        // With a fixed R the pass is the posterior of equal-variance
        // observations, so the order of the window does not change the result
        let mut forward = KalmanFilter::new(&config(2, 1.0, 0.0));
        forward.update(0.0);
        let a = forward.update(10.0).unwrap().estimate;

        let mut reverse = KalmanFilter::new(&config(2, 1.0, 0.0));
        reverse.update(10.0);
        let b = reverse.update(0.0).unwrap().estimate;

        // P0=1, R=1: K1=1/2, K2=1/3
        assert_abs_diff_eq!(a, 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b, 10.0 / 3.0, epsilon = 1e-12);

        reverse.update(0.0);
        let c = reverse.estimate();
        assert_abs_diff_eq!(c, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reject_non_positive_noise() {
        let mut filter = KalmanFilter::default();
        assert!(matches!(
            filter.set_noise_covariance(0.0),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            filter.set_noise_covariance(-1.0),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(filter.set_noise_covariance(f64::NAN).is_err());
        assert_eq!(filter.noise_covariance(), 0.5);

        filter.set_noise_covariance(0.05).unwrap();
        assert_eq!(filter.noise_covariance(), 0.05);
    }

    #[test]
    fn test_window_size_clamping() {
        let mut filter = KalmanFilter::default();

        let err = filter.set_window_size(0).unwrap_err();
        assert!(err.to_string().contains("below the minimum"));
        assert_eq!(filter.window_size(), 1);

        let err = filter.set_window_size(1000).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
        assert_eq!(filter.window_size(), 100);

        assert_eq!(filter.set_window_size(30), Ok(30));
        assert_eq!(filter.window_size(), 30);
    }

    #[test]
    fn test_set_init_value_leaves_history() {
        let mut filter = KalmanFilter::new(&config(5, 0.5, 1.0));
        filter.update(2.0);
        let before: Vec<f64> = filter.history().slots().to_vec();

        filter.set_init_value(8.0);
        filter.set_init_value(8.0);

        assert_eq!(filter.init_value(), 8.0);
        assert_eq!(filter.history().slots(), before.as_slice());
    }

    #[test]
    fn test_calibration_suppresses_output() {
        let mut filter = KalmanFilter::default();
        filter.set_calibration(true).unwrap();
        assert_eq!(filter.mode(), FilterMode::Calibrating);
        assert!(filter.update(3.0).is_none());
        assert_eq!(filter.calibration_samples(), 1);
        // History untouched while calibrating
        assert!(filter.history().slots().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_calibration_reseeds_parameters() {
        let mut filter = KalmanFilter::default();
        filter.set_calibration(true).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            filter.update(v);
        }
        let stats = filter.set_calibration(false).unwrap().unwrap();

        assert_eq!(stats.sample_count, 5);
        assert_eq!(filter.mode(), FilterMode::Normal);
        assert_abs_diff_eq!(filter.init_value(), 3.0);
        assert_abs_diff_eq!(filter.noise_covariance(), 1.0);
        assert!(filter.history().slots().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_calibration_without_samples() {
        let mut filter = KalmanFilter::new(&config(4, 0.3, 2.0));
        filter.update(9.0);
        filter.set_calibration(true).unwrap();

        let err = filter.set_calibration(false).unwrap_err();
        assert!(matches!(err, FilterError::InsufficientData { .. }));
        assert_eq!(filter.mode(), FilterMode::Normal);
        assert_eq!(filter.init_value(), 2.0);
        assert_eq!(filter.noise_covariance(), 0.3);
        assert!(filter.history().slots().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_calibration_constant_input_keeps_noise() {
        let mut filter = KalmanFilter::default();
        filter.set_calibration(true).unwrap();
        filter.update(0.0);
        filter.update(0.0);
        filter.set_calibration(false).unwrap();
        assert_eq!(filter.noise_covariance(), 0.5);
        assert_eq!(filter.init_value(), 0.0);
    }

    #[test]
    fn test_leave_calibration_when_not_calibrating() {
        let mut filter = KalmanFilter::new(&config(3, 0.5, 1.0));
        filter.update(4.0);
        assert_eq!(filter.set_calibration(false), Ok(None));
        assert_eq!(filter.init_value(), 1.0);
        assert_eq!(filter.history().slots()[0], 4.0);
    }

    #[test]
    fn test_reentering_calibration_restarts_statistics() {
        let mut filter = KalmanFilter::default();
        filter.set_calibration(true).unwrap();
        filter.update(100.0);
        filter.set_calibration(true).unwrap();
        assert_eq!(filter.calibration_samples(), 0);
        filter.update(2.0);
        filter.update(2.0);
        let stats = filter.set_calibration(false).unwrap().unwrap();
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn test_construction_corrects_bad_values() {
        let filter = KalmanFilter::new(&config(0, -2.0, 0.0));
        assert_eq!(filter.window_size(), 1);
        assert_eq!(filter.noise_covariance(), DEFAULT_NOISE_COVARIANCE);

        let filter = KalmanFilter::new(&config(250, 1.0, 0.0));
        assert_eq!(filter.window_size(), 100);
    }
}
