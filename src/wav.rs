use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

/// Samples of a single WAV channel, normalised to [-1, 1] for integer formats
pub struct WavChannel {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

/// Read one channel of a WAV file
pub fn read_wav_channel<P: AsRef<Path>>(path: P, channel: u16) -> anyhow::Result<WavChannel> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    if channel >= spec.channels {
        anyhow::bail!(
            "Channel {} requested, file has {} channel(s)",
            channel,
            spec.channels
        );
    }

    let interleaved = read_samples(reader, &spec)?;
    let samples = interleaved
        .iter()
        .skip(channel as usize)
        .step_by(spec.channels as usize)
        .map(|&s| s as f64)
        .collect();

    Ok(WavChannel {
        samples,
        sample_rate: spec.sample_rate,
    })
}

fn read_samples(mut reader: WavReader<BufReader<File>>, spec: &WavSpec) -> anyhow::Result<Vec<f32>> {
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                anyhow::bail!("Unsupported integer bit depth {}", spec.bits_per_sample);
            }
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Write mono 32-bit float samples
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f64],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }

    writer.finalize()?;
    Ok(())
}
