use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use kalmansmooth::host::{Command, FilterRegistry, InstanceId, Outlet};
use kalmansmooth::output::{FilterRecord, Formatter, OutputFormat, create_formatter};

#[derive(Parser, Debug)]
#[command(name = "kalmansmooth")]
#[command(
    about = "Smooth a stream of scalar measurements with a windowed Kalman filter",
    long_about = "Reads one message per line (or several separated by ';'): a bare number is a \
                  measurement; `noise <v>`, `init <v>`, `mean <v>`, `iterations <n>` and \
                  `analyze <0|1>` change parameters. Lines starting with '#' are ignored."
)]
struct Args {
    /// Creation arguments: [iterations] [noise] [init]
    #[arg(num_args = 0..=3, allow_negative_numbers = true)]
    creation_args: Vec<String>,

    /// Read messages from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also print values from the accuracy outlet
    #[arg(long)]
    accuracy: bool,

    /// Include sequence number and raw measurement in text output
    #[arg(short = 'd', long)]
    detailed: bool,

    /// Increase log verbosity
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

    let reader: Box<dyn BufRead> = match args.input {
        Some(ref path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let formatter = create_formatter(args.format, args.detailed);

    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut registry = FilterRegistry::new();
    let instance = registry.create(args.creation_args.as_slice());

    run_message_loop(
        reader,
        &mut out,
        &mut registry,
        instance,
        formatter.as_ref(),
        args.accuracy,
    )?;

    registry.destroy(instance)?;
    out.flush()?;
    Ok(())
}

fn run_message_loop(
    reader: Box<dyn BufRead>,
    out: &mut impl Write,
    registry: &mut FilterRegistry,
    instance: InstanceId,
    formatter: &dyn Formatter,
    show_accuracy: bool,
) -> anyhow::Result<()> {
    let mut sequence: u64 = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for message in line.split(';').map(str::trim).filter(|m| !m.is_empty()) {
            let command: Command = match message.parse() {
                Ok(cmd) => cmd,
                Err(e) => {
                    log::warn!("line {}: {}", line_no + 1, e);
                    continue;
                }
            };

            let Command::Measurement(measurement) = command else {
                registry.dispatch(instance, command)?;
                continue;
            };

            for event in registry.dispatch(instance, command)? {
                if event.outlet == Outlet::Accuracy && !show_accuracy {
                    continue;
                }
                let record = FilterRecord {
                    sequence,
                    outlet: event.outlet,
                    measurement,
                    value: event.value,
                };
                writeln!(out, "{}", formatter.format(&record))?;
            }
            sequence += 1;
        }
    }

    Ok(())
}
