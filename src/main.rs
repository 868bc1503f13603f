use anyhow::{Context, Result};
use clap::Parser;
use simplewave::{InfoEntry, InfoTag, Sweep, Wav, WaveWriter};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Write a sine sweep to a mono 16 bit wav file
#[derive(Parser, Debug)]
#[command(name = "simplewave", version)]
struct Args {
    /// Sample rate in Hz
    sample_rate: u32,
    /// Frequency at the start of the sweep in Hz
    start_hz: f64,
    /// Frequency at the end of the sweep in Hz
    end_hz: f64,
    /// Length of the sweep in seconds
    duration: f64,
    /// Output file, overwritten if it exists
    output: PathBuf,
    /// Track title stored in the INFO chunk
    #[arg(long)]
    title: Option<String>,
    /// Artist stored in the INFO chunk
    #[arg(long)]
    artist: Option<String>,
    /// Read the file back after writing and log a summary
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simplewave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    write_sweep(&args)?;

    if args.verify {
        verify(&args)?;
    }

    Ok(())
}

fn metadata(args: &Args) -> Vec<InfoEntry> {
    let mut metadata = vec![
        InfoEntry::new(InfoTag::CreatingSoftware, env!("CARGO_PKG_NAME")),
        InfoEntry::new(
            InfoTag::Comment,
            format!("sweep from {} Hz to {} Hz", args.start_hz, args.end_hz),
        ),
    ];

    if let Some(title) = &args.title {
        metadata.push(InfoEntry::new(InfoTag::TrackTitle, title.as_str()));
    }

    if let Some(artist) = &args.artist {
        metadata.push(InfoEntry::new(InfoTag::Artist, artist.as_str()));
    }

    metadata
}

fn write_sweep(args: &Args) -> Result<()> {
    let sweep = Sweep::new(args.sample_rate, args.start_hz, args.end_hz, args.duration)?;

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut writer = WaveWriter::new(BufWriter::new(file), args.sample_rate)?;

    for sample in sweep {
        writer.write_sample(sample)?;
    }

    writer
        .finish(&metadata(args))
        .with_context(|| format!("failed to finish {}", args.output.display()))?;

    tracing::info!(
        "Wrote {} samples at {} Hz to {}",
        writer.sample_count(),
        writer.sample_rate(),
        args.output.display()
    );

    Ok(())
}

fn verify(args: &Args) -> Result<()> {
    let bytes = fs::read(&args.output)
        .with_context(|| format!("failed to read {}", args.output.display()))?;

    let wav = Wav::from_bytes(&bytes)
        .with_context(|| format!("{} is not a valid wav file", args.output.display()))?;

    tracing::info!(
        "{}: {} Hz, {:.3} s, {} samples",
        args.output.display(),
        wav.fmt.sample_rate,
        wav.duration_secs(),
        wav.samples.len()
    );

    for entry in &wav.info {
        tracing::info!("{:?}: {}", entry.tag, entry.text);
    }

    Ok(())
}
