pub mod history;
pub mod kalman;
pub mod stream_analyzer;

pub use history::WindowHistory;
pub use kalman::{FilterMode, FilterOutput, KalmanFilter};
pub use stream_analyzer::{AnalyzerSnapshot, StreamAnalyzer};
