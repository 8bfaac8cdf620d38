//! Devwire frame replay
//!
//! Feeds recorded frames through the decoder and prints every normalized
//! event as one JSON line on stdout. Logs go to stderr.

mod frame_reader;

use anyhow::{Context, Result};
use clap::Parser;
use devwire_core::{
    DecoderConfig, EventStream, FrameProcessor, NormalizedEvent, SharedTracking, TrackingState,
};
use frame_reader::{FrameReader, ReplayLine};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Replay hex-encoded device frames through the decoder
#[derive(Parser, Debug)]
#[command(name = "devwire-replay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay recorded device frames and print normalized events", long_about = None)]
struct Args {
    /// Frame file, one hex frame per line (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Decoder config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device to track
    #[arg(long)]
    track_device: Option<i64>,

    /// Only forward hardware telemetry from the tracked device
    #[arg(long, default_value_t = false)]
    track_only: bool,

    /// Emit debug records (overrides the config file)
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Event channel capacity
    #[arg(long, default_value_t = 1024)]
    channel_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // --debug without an explicit level would hide the records
    let level = if args.debug && args.log_level == "warn" {
        "debug"
    } else {
        args.log_level.as_str()
    };
    setup_logging(level)?;

    let mut config = match &args.config {
        Some(path) => DecoderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DecoderConfig::default(),
    };
    if args.debug {
        config = config.with_debug(true);
    }
    debug!("Decoder config: {:?}", config);

    let tracking = SharedTracking::new(TrackingState {
        tracked_device_id: args.track_device,
        track_only_by_device_id: args.track_only,
    });

    let (stream, rx) = EventStream::new(args.channel_capacity.max(1));
    let printer = tokio::spawn(print_events(rx));

    let mut processor = FrameProcessor::new(&config, stream, tracking.subscribe())
        .context("Invalid decoder config")?;

    match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            replay(BufReader::new(file), &mut processor, &tracking).await?;
        }
        None => replay(BufReader::new(tokio::io::stdin()), &mut processor, &tracking).await?,
    }

    let stats = processor.stats();
    let lost = processor.publisher().dropped();
    drop(processor);

    let printed = printer.await.context("Event printer task failed")??;

    info!("Replay finished: {} events printed", printed);
    if lost > 0 {
        warn!("{} events lost to a full event channel", lost);
    }
    eprintln!("{}", serde_json::to_string(&stats)?);

    Ok(())
}

/// Drive every line of `reader` through the processor
async fn replay<R, P>(
    reader: R,
    processor: &mut FrameProcessor<P, tokio::sync::watch::Receiver<TrackingState>>,
    tracking: &SharedTracking,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    P: devwire_core::Publisher,
{
    let mut reader = FrameReader::new(reader);

    while let Some((line_no, line)) = reader.next_line().await? {
        match line {
            ReplayLine::Frame(raw) => {
                let published = processor.ingest(raw);
                debug!("Line {}: {} events", line_no, published);
                // Let the printer drain before the channel fills up
                tokio::task::yield_now().await;
            }
            ReplayLine::Track(device_id) => {
                info!("Line {}: tracking device {:?}", line_no, device_id);
                tracking.track_device(device_id);
            }
            ReplayLine::TrackOnly(enabled) => {
                info!("Line {}: track-only {}", line_no, enabled);
                tracking.set_track_only(enabled);
            }
            ReplayLine::Invalid(reason) => {
                warn!("Line {}: skipped ({})", line_no, reason);
            }
        }
    }

    Ok(())
}

/// Print events as JSON lines until the channel closes
async fn print_events(mut rx: mpsc::Receiver<NormalizedEvent>) -> Result<u64> {
    let mut printed = 0;
    while let Some(event) = rx.recv().await {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, &event)?;
        writeln!(stdout)?;
        printed += 1;
    }
    Ok(printed)
}

/// Setup logging to stderr
fn setup_logging(level: &str) -> Result<()> {
    let log_level = level.parse::<Level>().unwrap_or(Level::WARN);

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
