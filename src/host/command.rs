use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};
use crate::signal_processing::KalmanFilter;

/// Message delivered to a filter instance
///
/// # Parsing formats
/// - `1.25` or `float 1.25` - measurement
/// - `noise 0.3` - measurement noise covariance
/// - `init 2` or `mean 2` - initial value
/// - `iterations 20` - window size
/// - `analyze 1` / `analyze 0` - enter / leave calibration
///
/// A trailing `;` is accepted.
///
/// # Example
/// ```
/// use kalmansmooth::host::Command;
///
/// let cmd: Command = "noise 0.25;".parse().unwrap();
/// assert_eq!(cmd, Command::Noise(0.25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Measurement(f64),
    Noise(f64),
    Init(f64),
    Iterations(f64),
    /// Positive enters calibration, zero or negative leaves it
    Analyze(f64),
}

/// Output channel of a filter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlet {
    Filter,
    Accuracy,
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => f.pad("filter"),
            Self::Accuracy => f.pad("accuracy"),
        }
    }
}

/// Value emitted on an outlet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutletEvent {
    pub outlet: Outlet,
    pub value: f64,
}

impl Command {
    /// Apply the command to `filter`
    ///
    /// Parameter errors are reported through the log and never stop the
    /// instance. Only measurements processed in normal mode produce events:
    /// one on [`Outlet::Filter`] followed by one on [`Outlet::Accuracy`].
    pub fn apply(self, filter: &mut KalmanFilter) -> Vec<OutletEvent> {
        let outcome = match self {
            Self::Measurement(value) => {
                return filter
                    .update(value)
                    .map(|out| {
                        vec![
                            OutletEvent {
                                outlet: Outlet::Filter,
                                value: out.estimate,
                            },
                            OutletEvent {
                                outlet: Outlet::Accuracy,
                                value: out.accuracy,
                            },
                        ]
                    })
                    .unwrap_or_default();
            }
            Self::Noise(value) => filter.set_noise_covariance(value),
            Self::Init(value) => {
                filter.set_init_value(value);
                Ok(())
            }
            Self::Iterations(value) => filter.set_window_size(value as i64).map(|_| ()),
            Self::Analyze(value) => filter.set_calibration(value > 0.0).map(|_| ()),
        };

        if let Err(err) = outcome {
            log::debug!("kalman: {}", err);
        }
        Vec::new()
    }
}

impl FromStr for Command {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_suffix(';').unwrap_or(s).trim_end();
        let mut tokens = s.split_whitespace();

        let Some(head) = tokens.next() else {
            return Err(FilterError::InvalidArgument("empty message".to_string()));
        };

        if let Ok(value) = head.parse::<f64>() {
            if tokens.next().is_some() {
                return Err(FilterError::InvalidArgument(format!(
                    "unexpected list message: {}",
                    s
                )));
            }
            return Ok(Self::Measurement(finite(value, head)?));
        }

        let constructor: fn(f64) -> Self = match head {
            "float" => Self::Measurement,
            "noise" => Self::Noise,
            "init" | "mean" => Self::Init,
            "iterations" => Self::Iterations,
            "analyze" => Self::Analyze,
            other => return Err(FilterError::UnknownCommand(other.to_string())),
        };

        let arg = tokens
            .next()
            .ok_or_else(|| FilterError::InvalidArgument(format!("{} needs a value", head)))?;
        if tokens.next().is_some() {
            return Err(FilterError::InvalidArgument(format!(
                "{} takes exactly one value",
                head
            )));
        }
        let value = arg
            .parse::<f64>()
            .map_err(|_| FilterError::InvalidArgument(format!("{}: not a number: {}", head, arg)))?;

        Ok(constructor(finite(value, arg)?))
    }
}

fn finite(value: f64, text: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FilterError::InvalidArgument(format!(
            "value must be finite: {}",
            text
        )))
    }
}
