use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::{NoiseConfig, TruthSignal, apply_noise};

/// A simulated measurement run, usually loaded from TOML
///
/// ```toml
/// length = 1000
/// calibrate = 200
///
/// [signal]
/// type = "step"
/// before = 0.0
/// after = 5.0
/// at = 500
///
/// [noise]
/// seed = 42
/// additive = { std_dev = 0.5 }
/// impulse = { probability = 0.01, amplitude = 5.0 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default)]
    pub signal: TruthSignal,
    #[serde(default)]
    pub noise: NoiseConfig,
    /// Leading samples to wrap in `analyze 1` / `analyze 0`
    #[serde(default)]
    pub calibrate: Option<usize>,
    /// Parameter messages emitted before the first measurement
    #[serde(default)]
    pub preamble: Vec<String>,
}

fn default_length() -> usize {
    1000
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            length: default_length(),
            signal: TruthSignal::default(),
            noise: NoiseConfig::default(),
            calibrate: None,
            preamble: Vec::new(),
        }
    }
}

/// Truth and noisy measurements of one scenario run
pub struct ScenarioRun {
    pub truth: Vec<f64>,
    pub measurements: Vec<f64>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).context("Failed to read scenario file")?;
        toml::from_str(&content).context("Failed to parse scenario file")
    }

    pub fn run(&self) -> anyhow::Result<ScenarioRun> {
        let truth = self.signal.generate(self.length);
        let measurements = apply_noise(&truth, &self.noise)?;
        Ok(ScenarioRun {
            truth,
            measurements,
        })
    }

    /// Render a run as line-protocol messages
    pub fn to_messages(&self, run: &ScenarioRun) -> Vec<String> {
        let mut messages = self.preamble.clone();
        let calibrate = self.calibrate.unwrap_or(0).min(run.measurements.len());

        if calibrate > 0 {
            messages.push("analyze 1".to_string());
        }
        for (i, m) in run.measurements.iter().enumerate() {
            if calibrate > 0 && i == calibrate {
                messages.push("analyze 0".to_string());
            }
            messages.push(format!("{}", m));
        }
        if calibrate > 0 && calibrate == run.measurements.len() {
            messages.push("analyze 0".to_string());
        }

        messages
    }
}
