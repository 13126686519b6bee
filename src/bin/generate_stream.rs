use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use kalmansmooth::simulation::{AdditiveNoiseConfig, Scenario, residual_std_dev};

#[derive(Parser, Debug)]
#[command(name = "generate_stream")]
#[command(about = "Generate noisy measurement streams in the kalmansmooth message format")]
struct Args {
    /// TOML scenario file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the message stream (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the noise-free signal, one value per line
    #[arg(long)]
    truth: Option<PathBuf>,

    /// Write a JSON manifest describing the run
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Number of samples (overrides the scenario)
    #[arg(short, long)]
    length: Option<usize>,

    /// Seed for reproducibility (overrides the scenario)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Gaussian noise standard deviation (overrides the scenario)
    #[arg(long)]
    std_dev: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Manifest {
    length: usize,
    seed: Option<u64>,
    calibrate: Option<usize>,
    measured_noise_std_dev: f64,
    stream: Option<String>,
    truth: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut scenario = match args.config {
        Some(ref path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(length) = args.length {
        scenario.length = length;
    }
    if let Some(seed) = args.seed {
        scenario.noise.seed = Some(seed);
    }
    if let Some(std_dev) = args.std_dev {
        scenario.noise.additive = Some(AdditiveNoiseConfig { std_dev });
    }

    let run = scenario.run()?;
    let messages = scenario.to_messages(&run);

    let mut out: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(BufWriter::new(
            fs::File::create(path).context("Failed to create output file")?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    for message in &messages {
        writeln!(out, "{}", message)?;
    }
    out.flush()?;

    if let Some(ref path) = args.truth {
        let content: String = run.truth.iter().map(|t| format!("{}\n", t)).collect();
        fs::write(path, content).context("Failed to write truth file")?;
    }

    if let Some(ref path) = args.manifest {
        let manifest = Manifest {
            length: scenario.length,
            seed: scenario.noise.seed,
            calibrate: scenario.calibrate,
            measured_noise_std_dev: residual_std_dev(&run.measurements, &run.truth),
            stream: args.output.as_ref().map(|p| p.display().to_string()),
            truth: args.truth.as_ref().map(|p| p.display().to_string()),
        };
        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(path, json).context("Failed to write manifest")?;
    }

    log::info!(
        "Generated {} messages ({} samples)",
        messages.len(),
        scenario.length
    );
    Ok(())
}
