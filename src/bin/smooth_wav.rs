use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use kalmansmooth::config::FilterConfig;
use kalmansmooth::constants::{DEFAULT_INIT_VALUE, DEFAULT_NOISE_COVARIANCE, DEFAULT_WINDOW_SIZE};
use kalmansmooth::signal_processing::KalmanFilter;
use kalmansmooth::wav::read_wav_channel;
use kalmansmooth::save_wav;

#[derive(Parser, Debug)]
#[command(name = "smooth_wav")]
#[command(about = "Run one channel of a WAV file through the windowed Kalman filter", long_about = None)]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file (mono, 32-bit float)
    output: PathBuf,

    /// Channel to read (0 = left)
    #[arg(short, long, default_value_t = 0)]
    channel: u16,

    /// Window size (1-100)
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: usize,

    /// Measurement noise covariance
    #[arg(short, long, default_value_t = DEFAULT_NOISE_COVARIANCE)]
    noise: f64,

    /// Initial estimate
    #[arg(long, default_value_t = DEFAULT_INIT_VALUE, allow_negative_numbers = true)]
    init: f64,

    /// Calibrate on this many leading samples before filtering.
    /// Calibration samples are not written to the output.
    #[arg(long)]
    calibrate: Option<usize>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let wav = read_wav_channel(&args.input, args.channel)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let config = FilterConfig {
        window_size: args.window,
        noise_covariance: args.noise,
        init_value: args.init,
    };
    let mut filter = KalmanFilter::new(&config);

    let mut samples = wav.samples.as_slice();
    if let Some(count) = args.calibrate {
        let count = count.min(samples.len());
        let (head, rest) = samples.split_at(count);

        filter.set_calibration(true)?;
        for &s in head {
            filter.update(s);
        }
        let stats = filter
            .set_calibration(false)
            .context("Calibration needs at least one sample")?;
        if let Some(stats) = stats {
            println!(
                "Calibrated on {} samples: mean {:.6}, std dev {:.6}, noise covariance {:.6}",
                stats.sample_count,
                stats.mean,
                stats.standard_deviation,
                filter.noise_covariance()
            );
        }
        samples = rest;
    }

    let filtered: Vec<f64> = samples
        .iter()
        .filter_map(|&s| filter.update(s).map(|out| out.estimate))
        .collect();

    save_wav(&args.output, &filtered, wav.sample_rate)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} samples at {} Hz to {}",
        filtered.len(),
        wav.sample_rate,
        args.output.display()
    );

    Ok(())
}
