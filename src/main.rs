use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use flowrex::config::Config;
use flowrex::exchange::HistoricalFeed;
use flowrex::stream::{run_stream, AnalysisStream, StreamKey};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    flowrex::telemetry::init(&cfg.log_level);

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        anyhow::bail!("usage: flowrex <candles.json>");
    };

    let settings = cfg.playbooks().context("loading playbook settings")?;
    let mut feed = HistoricalFeed::from_file(&path)
        .with_context(|| format!("loading candles from {}", path.display()))?;

    let key = StreamKey {
        provider: "replay".to_string(),
        symbol: cfg.symbol.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
        timeframe: cfg.timeframe,
    };
    info!(
        "Replaying {} candles on {} ({} .. {})",
        feed.remaining(),
        key,
        feed.earliest_time().map_or("-".to_string(), |t| t.to_rfc3339()),
        feed.latest_time().map_or("-".to_string(), |t| t.to_rfc3339()),
    );

    let mut stream = AnalysisStream::new(key, cfg.risk.lookback, settings, cfg.metadata());
    let signals = run_stream(&mut stream, &mut feed).await?;

    if signals.is_empty() {
        warn!("No actionable signals in {}", path.display());
    }
    for signal in &signals {
        println!("{}", serde_json::to_string(signal)?);
    }
    info!("Replay complete: {} signals", signals.len());

    Ok(())
}
