use rolling_stats::Stats;

use crate::config::FilterConfig;
use crate::signal_processing::KalmanFilter;

/// Error of a filtered stream against its truth signal
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct ErrorStats {
    pub count: usize,
    pub mean_error: f64,
    pub std_dev: f64,
    pub max_abs_error: f64,
    pub rms_error: f64,
}

impl ErrorStats {
    /// Statistics of `estimate - truth`, skipping the first `skip` samples
    pub fn compute(estimates: &[f64], truth: &[f64], skip: usize) -> Self {
        let mut stats: Stats<f64> = Stats::new();
        let mut sum_sq = 0.0;

        for (e, t) in estimates.iter().zip(truth).skip(skip) {
            let err = e - t;
            stats.update(err);
            sum_sq += err * err;
        }

        if stats.count == 0 {
            return Self::default();
        }

        Self {
            count: stats.count,
            mean_error: stats.mean,
            std_dev: stats.std_dev,
            max_abs_error: stats.max.abs().max(stats.min.abs()),
            rms_error: (sum_sq / stats.count as f64).sqrt(),
        }
    }
}

/// Feed every measurement through `filter`, collecting emitted estimates
pub fn run_filter(filter: &mut KalmanFilter, measurements: &[f64]) -> Vec<f64> {
    measurements
        .iter()
        .filter_map(|&m| filter.update(m).map(|out| out.estimate))
        .collect()
}

/// Filter `measurements` with a fresh instance and score it against `truth`
///
/// The first window's worth of output is excluded from the statistics so
/// the start-up transient does not dominate.
pub fn measure_error(measurements: &[f64], truth: &[f64], config: &FilterConfig) -> ErrorStats {
    let mut filter = KalmanFilter::new(config);
    let estimates = run_filter(&mut filter, measurements);
    ErrorStats::compute(&estimates, truth, filter.window_size())
}
