use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use kalmansmooth::config::FilterConfig;
use kalmansmooth::signal_processing::KalmanFilter;
use kalmansmooth::simulation::{ErrorStats, Scenario, TruthSignal, measure_error, run_filter};

#[derive(Parser, Debug)]
#[command(name = "noise_analysis")]
#[command(about = "Sweep window size and noise covariance against a simulated scenario")]
struct Args {
    /// TOML scenario file (defaults to a noisy step)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window sizes to test
    #[arg(short, long, value_delimiter = ',', default_value = "5,10,20,30,50,100")]
    windows: Vec<usize>,

    /// Noise covariances to test
    #[arg(short, long, value_delimiter = ',', default_value = "0.05,0.1,0.5,1,5")]
    noise: Vec<f64>,

    /// Samples used for the calibrated run
    #[arg(long, default_value_t = 200)]
    calibrate: usize,
}

fn default_scenario() -> Scenario {
    let mut scenario = Scenario {
        length: 4000,
        signal: TruthSignal::Step {
            before: 0.0,
            after: 5.0,
            at: 2000,
        },
        ..Scenario::default()
    };
    scenario.noise = scenario.noise.with_seed(42).with_gaussian(0.5);
    scenario
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = match args.config {
        Some(ref path) => Scenario::load(path)?,
        None => default_scenario(),
    };
    let run = scenario.run()?;

    println!("mode,window,noise,count,rms_error,max_abs_error,mean_error,std_dev");

    let raw = ErrorStats::compute(&run.measurements, &run.truth, 0);
    print_row("raw", 0, 0.0, &raw);

    for &window in &args.windows {
        for &noise in &args.noise {
            let config = FilterConfig {
                window_size: window,
                noise_covariance: noise,
                init_value: run.truth.first().copied().unwrap_or_default(),
            };
            let stats = measure_error(&run.measurements, &run.truth, &config);
            print_row("fixed", window, noise, &stats);
        }
    }

    // Let the analyzer choose init and noise from the leading samples
    let calibrate = args.calibrate.min(run.measurements.len());
    for &window in &args.windows {
        let mut filter = KalmanFilter::new(&FilterConfig {
            window_size: window,
            ..FilterConfig::default()
        });
        filter.set_calibration(true)?;
        run_filter(&mut filter, &run.measurements[..calibrate]);
        if let Err(e) = filter.set_calibration(false) {
            log::warn!("calibration skipped: {}", e);
        }

        let estimates = run_filter(&mut filter, &run.measurements[calibrate..]);
        let stats = ErrorStats::compute(&estimates, &run.truth[calibrate..], window);
        print_row("calibrated", window, filter.noise_covariance(), &stats);
    }

    Ok(())
}

fn print_row(mode: &str, window: usize, noise: f64, stats: &ErrorStats) {
    println!(
        "{},{},{:.4},{},{:.5},{:.5},{:.5},{:.5}",
        mode,
        window,
        noise,
        stats.count,
        stats.rms_error,
        stats.max_abs_error,
        stats.mean_error,
        stats.std_dev
    );
}
