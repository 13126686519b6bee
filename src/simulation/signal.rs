use std::f64::consts::PI;

/// Noise-free signal the simulated sensor is measuring
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TruthSignal {
    Constant {
        level: f64,
    },
    /// Jumps from `before` to `after` at sample `at`
    Step {
        before: f64,
        after: f64,
        at: usize,
    },
    Ramp {
        start: f64,
        slope: f64,
    },
    /// `offset + amplitude * sin(2π n / period)`, period in samples
    Sine {
        offset: f64,
        amplitude: f64,
        period: f64,
    },
}

impl Default for TruthSignal {
    fn default() -> Self {
        Self::Constant { level: 0.0 }
    }
}

impl TruthSignal {
    pub fn value_at(&self, n: usize) -> f64 {
        match *self {
            Self::Constant { level } => level,
            Self::Step { before, after, at } => {
                if n < at {
                    before
                } else {
                    after
                }
            }
            Self::Ramp { start, slope } => start + slope * n as f64,
            Self::Sine {
                offset,
                amplitude,
                period,
            } => offset + amplitude * (2.0 * PI * n as f64 / period).sin(),
        }
    }

    pub fn generate(&self, len: usize) -> Vec<f64> {
        (0..len).map(|n| self.value_at(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step() {
        let signal = TruthSignal::Step {
            before: 1.0,
            after: 4.0,
            at: 2,
        };
        assert_eq!(signal.generate(4), vec![1.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_sine_quarter_period() {
        let signal = TruthSignal::Sine {
            offset: 1.0,
            amplitude: 2.0,
            period: 8.0,
        };
        assert!((signal.value_at(2) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_tagged() {
        let signal: TruthSignal = toml::from_str("type = \"ramp\"\nstart = 1.0\nslope = 0.5").unwrap();
        assert_eq!(
            signal,
            TruthSignal::Ramp {
                start: 1.0,
                slope: 0.5
            }
        );
    }
}
