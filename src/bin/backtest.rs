use std::path::PathBuf;

use anyhow::{Context, Result};

use flowrex::backtesting::data_loader::load_candles;
use flowrex::backtesting::run_backtest;
use flowrex::config::Config;
use flowrex::strategies::playbooks::PlaybookName;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    flowrex::telemetry::init(&cfg.log_level);

    // backtest <candles.json> [playbook|all] [pdh] [pdl]
    let args: Vec<String> = std::env::args().collect();

    let Some(path) = args.get(1).map(PathBuf::from) else {
        anyhow::bail!("usage: backtest <candles.json> [playbook|all] [pdh] [pdl]");
    };

    let playbook_filter = match args.get(2).map(String::as_str) {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<PlaybookName>()
                .with_context(|| format!("unknown playbook '{raw}'"))?,
        ),
    };

    let previous_day_high: Option<f64> = args.get(3).and_then(|s| s.parse().ok());
    let previous_day_low: Option<f64> = args.get(4).and_then(|s| s.parse().ok());

    let settings = cfg.playbooks().context("loading playbook settings")?;
    let candles = load_candles(&path)
        .with_context(|| format!("loading candles from {}", path.display()))?;

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║          FLOWREX PLAYBOOK BACKTESTER                     ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Symbol:     {:<44}║", cfg.symbol.as_deref().unwrap_or("-"));
    println!("║  Candles:    {:<44}║", candles.len());
    println!("║  Playbook:   {:<44}║", playbook_filter.map_or("all", |p| p.as_str()));
    println!("║  Capital:    ${:<43.2}║", cfg.starting_capital);
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        println!(
            "Backtesting from {} to {}",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M")
        );
        println!();
    }

    let result = run_backtest(
        &candles,
        previous_day_high,
        previous_day_low,
        &cfg.risk,
        &settings,
        cfg.starting_capital,
        playbook_filter,
    )?;

    result.print_summary();

    Ok(())
}
