use crate::error::{FilterError, Result};

/// Statistics derived from the samples seen during calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerSnapshot {
    /// Number of samples the statistics cover
    pub sample_count: u64,
    /// Arithmetic mean of the samples
    pub mean: f64,
    /// Sample standard deviation (1.0 for a single sample)
    pub standard_deviation: f64,
    /// Mean of `|x[n] - x[n-1]|`, with `x[-1] = 0`
    pub mean_absolute_delta: f64,
}

/// Running statistics over an unbounded stream
///
/// Only sums are kept, so memory use does not grow with the number of
/// observations. Derived values are computed on request by
/// [`StreamAnalyzer::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct StreamAnalyzer {
    sample_count: u64,
    sum: f64,
    sum_of_squares: f64,
    sum_of_absolute_deltas: f64,
    previous_value: f64,
}

impl StreamAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one raw sample
    ///
    /// The first sample after a reset is compared against 0.
    pub fn observe(&mut self, value: f64) {
        self.sample_count += 1;
        self.sum += value;
        self.sum_of_squares += value * value;
        self.sum_of_absolute_deltas += (value - self.previous_value).abs();
        self.previous_value = value;
    }

    /// Derived statistics for everything observed since the last reset
    ///
    /// # Errors
    /// `InsufficientData` if nothing has been observed.
    pub fn snapshot(&self) -> Result<AnalyzerSnapshot> {
        if self.sample_count == 0 {
            return Err(FilterError::InsufficientData {
                needed: 1,
                available: 0,
            });
        }

        let n = self.sample_count as f64;
        let standard_deviation = if self.sample_count == 1 {
            1.0
        } else {
            // Rounding can leave a tiny negative residue for constant input
            let residual = (self.sum_of_squares - self.sum * self.sum / n).max(0.0);
            (residual / (n - 1.0)).sqrt()
        };

        Ok(AnalyzerSnapshot {
            sample_count: self.sample_count,
            mean: self.sum / n,
            standard_deviation,
            mean_absolute_delta: self.sum_of_absolute_deltas / n,
        })
    }

    /// Clear every accumulator and the remembered previous value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}
