//! Filter parameter bounds and defaults
//!
//! Every filter instance starts from these values unless creation arguments
//! or parameter messages override them.

/// Hard cap on the number of measurements kept in the window.
/// The history buffer is always allocated at this size.
pub const MAX_WINDOW_SIZE: usize = 100;

/// Smallest usable window.
pub const MIN_WINDOW_SIZE: usize = 1;

/// Window size used when none is given at creation.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Measurement noise covariance used when none is given at creation.
pub const DEFAULT_NOISE_COVARIANCE: f64 = 0.5;

/// Seed for the recursive estimate used when none is given at creation.
pub const DEFAULT_INIT_VALUE: f64 = 0.0;

/// Error covariance at the start of every update pass.
pub const INITIAL_ERROR_COVARIANCE: f64 = 1.0;
