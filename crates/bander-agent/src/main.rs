//! Bander Agent
//!
//! Periodically scans the WiFi landscape and prints a congestion report
//! with ranked channel recommendations for each band.
//!
//! - Observations come from a pluggable source (`simulate` or `snapshot`)
//! - Settings come from an optional TOML file, overridden by flags
//! - Output is a human-readable table or one JSON document per cycle

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bander_agent::config::{AgentConfig, OutputFormat, SourceConfig};
use bander_agent::poll::Poller;
use bander_agent::source;
use bander_core::{Analyzer, ChannelPlan, ChannelRecommender, Region};
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// WiFi congestion scoring and channel recommendation agent.
#[derive(Parser, Debug)]
#[command(name = "bander-agent", about = "WiFi channel congestion analyzer")]
struct Cli {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Observation source: `simulate` or `snapshot`.
    #[arg(long)]
    source: Option<String>,

    /// Snapshot JSON file (implies `--source snapshot`).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Seconds between scans.
    #[arg(long)]
    interval: Option<u64>,

    /// Regulatory region: us, eu or jp.
    #[arg(long)]
    region: Option<Region>,

    /// Output format: text or json.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Run a single scan cycle and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Seed for the simulated source.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply(&self, mut config: AgentConfig) -> anyhow::Result<AgentConfig> {
        if let Some(secs) = self.interval {
            anyhow::ensure!(secs > 0, "--interval must be at least 1 second");
            config.scan_interval = Duration::from_secs(secs);
        }
        if let Some(region) = self.region {
            config.region = region;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        let kind = match (&self.source, &self.snapshot) {
            (Some(kind), _) => Some(kind.trim().to_ascii_lowercase()),
            (None, Some(_)) => Some("snapshot".to_string()),
            (None, None) => None,
        };
        match kind.as_deref() {
            None => {}
            Some("simulate") => {
                if !matches!(config.source, SourceConfig::Simulate { .. }) {
                    config.source = SourceConfig::Simulate { seed: None };
                }
            }
            Some("snapshot") => {
                let path = self
                    .snapshot
                    .clone()
                    .or_else(|| match &config.source {
                        SourceConfig::Snapshot { path } => Some(path.clone()),
                        SourceConfig::Simulate { .. } => None,
                    })
                    .context("--source snapshot requires --snapshot PATH")?;
                config.source = SourceConfig::Snapshot { path };
            }
            Some(other) => anyhow::bail!("unknown source: {other}"),
        }

        if let Some(seed) = self.seed {
            match &mut config.source {
                SourceConfig::Simulate { seed: s } => *s = Some(seed),
                SourceConfig::Snapshot { .. } => {
                    tracing::warn!(seed, "--seed has no effect on a snapshot source");
                }
            }
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    let config = cli.apply(base)?;

    tracing::info!(
        region = %config.region,
        interval_s = config.scan_interval.as_secs(),
        source = ?config.source,
        "bander-agent starting"
    );

    let recommender =
        ChannelRecommender::new(ChannelPlan::for_region(config.region)).with_top_n(config.top_n);
    let source = source::from_config(&config.source);
    let mut poller = Poller::new(source, Analyzer::with_recommender(recommender), config);
    let mut stdout = std::io::stdout();

    if cli.once {
        return poller.run_once(&mut stdout).await;
    }

    // ── Shutdown handling ───────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received SIGINT, shutting down");
        }
        let _ = shutdown_tx.send(true);
    });

    poller.run(&mut stdout, shutdown_rx).await?;
    tracing::info!("bander-agent stopped");
    Ok(())
}
