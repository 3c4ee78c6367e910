use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hlsgrab_core::{
    load_config, load_config_from_env, read_entries, validate_config, BatchScheduler, Config,
    FetchProgress, FfmpegRemuxer, HttpFetcher, ItemPipeline, Ledgers, Remuxer,
};

/// Config file picked up from the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "hlsgrab.toml";

/// Download HLS streams listed in a CSV table and remux them to MP4.
#[derive(Debug, Parser)]
#[command(name = "hlsgrab", version, about)]
struct Args {
    /// Input CSV table (id, title, master playlist URL).
    input: Option<PathBuf>,

    /// Configuration file.
    #[arg(short, long, env = "HLSGRAB_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of entries processed at once.
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Directory receiving the MP4 files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.json);

    let config = resolve_config(&args)?;
    validate_config(&config).context("Configuration validation failed")?;
    info!(
        input = %config.batch.input.display(),
        output_dir = %config.batch.output_dir.display(),
        concurrency = config.batch.concurrency,
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.batch.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory {:?}",
                config.batch.output_dir
            )
        })?;

    let fetcher =
        HttpFetcher::new(config.fetcher.clone()).context("Failed to create HTTP fetcher")?;

    let remuxer = FfmpegRemuxer::new(config.remux.clone());
    remuxer
        .validate()
        .await
        .context("FFmpeg is not usable")?;
    info!(ffmpeg = %config.remux.ffmpeg_path.display(), "Using remuxer: {}", remuxer.name());

    let entries = read_entries(&config.batch.input)
        .with_context(|| format!("Failed to read input {:?}", config.batch.input))?;
    info!(count = entries.len(), "Input table loaded");

    let mut ledgers = Ledgers::create(
        &config.batch.success_ledger,
        &config.batch.failure_ledger,
        config.batch.append_ledgers,
    )
    .await
    .context("Failed to open ledgers")?;

    let (progress_tx, progress_rx) = mpsc::channel(config.fetcher.progress_buffer);
    let progress_handle = tokio::spawn(log_progress(progress_rx));

    let pipeline =
        ItemPipeline::from_config(&config.batch, fetcher, remuxer).with_progress(progress_tx);
    let scheduler = BatchScheduler::from_config(&config.batch, pipeline);

    let summary = scheduler
        .run(entries, &mut ledgers)
        .await
        .context("Failed to record outcome")?;
    ledgers.finish().await.context("Failed to close ledgers")?;

    // Dropping the scheduler drops the last progress sender.
    drop(scheduler);
    let _ = progress_handle.await;

    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Done"
    );

    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Loads the configuration file (explicit path, or the default file when it
/// exists, or environment only) and applies command-line overrides.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None if PathBuf::from(DEFAULT_CONFIG_FILE).exists() => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };

    if let Some(input) = &args.input {
        config.batch.input = input.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.batch.concurrency = concurrency;
    }
    if let Some(output_dir) = &args.output_dir {
        config.batch.output_dir = output_dir.clone();
    }

    Ok(config)
}

async fn log_progress(mut rx: mpsc::Receiver<FetchProgress>) {
    while let Some(progress) = rx.recv().await {
        match progress.percent() {
            Some(percent) => debug!(
                url = %progress.url,
                bytes = progress.bytes_downloaded,
                "Fetching playlist: {:.0}%",
                percent
            ),
            None => debug!(
                url = %progress.url,
                bytes = progress.bytes_downloaded,
                "Fetching playlist"
            ),
        }
    }
}
