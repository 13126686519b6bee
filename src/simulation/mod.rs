mod measure;
mod noise;
mod scenario;
mod signal;

pub use measure::{ErrorStats, measure_error, run_filter};
pub use noise::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, apply_noise, residual_std_dev,
};
pub use scenario::{Scenario, ScenarioRun};
pub use signal::TruthSignal;
