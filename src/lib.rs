pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod output;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::FilterConfig;
pub use error::{FilterError, Result};
pub use signal_processing::{AnalyzerSnapshot, FilterOutput, KalmanFilter, StreamAnalyzer};
pub use wav::save_wav;
