use tracing::{debug, info, warn};

use crate::backtesting::report::{Counters, SimulationResult};
use crate::backtesting::trade::{ExitReason, Trade};
use crate::config::{PlaybookSettings, RiskConfig};
use crate::error::{Error, Result};
use crate::models::Candle;
use crate::pipeline::MIN_ANALYSIS_CANDLES;
use crate::strategies::classifier::classify;
use crate::strategies::context::build_context;
use crate::strategies::playbooks::PlaybookName;

/// Everything the replay carries from one candle to the next. Each step
/// consumes the previous state and returns the next one.
#[derive(Debug, Clone)]
struct ReplayState {
    capital: f64,
    open: Vec<Trade>,
    closed: Vec<Trade>,
    next_id: usize,
    counters: Counters,
}

/// Inputs shared by every step of one run.
struct Replay<'a> {
    candles: &'a [Candle],
    previous_day_high: Option<f64>,
    previous_day_low: Option<f64>,
    risk: &'a RiskConfig,
    settings: &'a PlaybookSettings,
    filter: Option<PlaybookName>,
}

/// Replay the full analysis pipeline candle by candle and simulate the
/// resulting trades.
///
/// Open trades are checked against each candle's range before any new
/// entry is considered. Entries fill at the signal candle's close, so a
/// trade can first exit on the following candle. Whatever is still open
/// after the last candle closes there with `END_OF_DATA`, including a
/// trade opened on that candle.
pub fn run_backtest(
    candles: &[Candle],
    previous_day_high: Option<f64>,
    previous_day_low: Option<f64>,
    risk: &RiskConfig,
    settings: &PlaybookSettings,
    starting_capital: f64,
    playbook_filter: Option<PlaybookName>,
) -> Result<SimulationResult> {
    if candles.len() < MIN_ANALYSIS_CANDLES {
        return Err(Error::InsufficientCandles {
            required: MIN_ANALYSIS_CANDLES,
            actual: candles.len(),
        });
    }

    info!("=== BACKTEST START ===");
    info!(
        "Candles: {} | Capital: ${:.2} | Risk {:.2}% | SL {} / TP {} pts | Filter: {}",
        candles.len(),
        starting_capital,
        risk.risk_percent,
        risk.stop_loss_points,
        risk.take_profit_points,
        playbook_filter.map_or("all", |p| p.as_str()),
    );

    let replay = Replay {
        candles,
        previous_day_high,
        previous_day_low,
        risk,
        settings,
        filter: playbook_filter,
    };

    let mut state = ReplayState {
        capital: starting_capital,
        open: Vec::new(),
        closed: Vec::new(),
        next_id: 1,
        counters: Counters::default(),
    };
    for index in 0..candles.len() {
        state = replay.step(state, index)?;
    }
    let state = replay.finish(state);

    let result = SimulationResult::from_replay(state.closed, starting_capital, state.capital, state.counters);

    info!("=== BACKTEST COMPLETE ===");
    info!(
        "Trades: {} | Win rate: {:.1}% | PnL ${:+.2} | Final ${:.2}",
        result.metrics.total_trades,
        result.metrics.win_rate,
        result.metrics.total_pnl_currency,
        result.final_capital,
    );

    Ok(result)
}

impl Replay<'_> {
    fn step(&self, state: ReplayState, index: usize) -> Result<ReplayState> {
        let candle = &self.candles[index];
        let ReplayState {
            mut capital,
            open,
            mut closed,
            mut next_id,
            mut counters,
        } = state;
        counters.candles_processed += 1;

        // Exits: open(t) = open(t-1) - closed_at(t)
        let mut still_open = Vec::with_capacity(open.len());
        for trade in open {
            match trade.check_exit(candle) {
                Some((price, reason)) => {
                    let done = trade.close(candle.timestamp, price, reason);
                    capital += done.profit_loss_currency();
                    debug!(
                        "[BT {}] #{} {} {} closed {} PnL ${:+.2}",
                        candle.timestamp.format("%m-%d %H:%M"),
                        done.id,
                        done.playbook,
                        done.direction,
                        reason,
                        done.profit_loss_currency(),
                    );
                    closed.push(done);
                }
                None => still_open.push(trade),
            }
        }

        // Entries: + opened_at(t)
        let window_start = (index + 1).saturating_sub(self.risk.lookback);
        let window = &self.candles[window_start..=index];
        if still_open.len() < self.risk.max_positions && window.len() >= MIN_ANALYSIS_CANDLES {
            let ctx = build_context(window, self.previous_day_high, self.previous_day_low)?;
            let output = classify(&ctx, self.settings);
            if let Some(signal) = output.signal {
                counters.signals_generated += 1;
                if self.filter.is_some_and(|f| f != signal.playbook) {
                    counters.signals_filtered += 1;
                } else {
                    let risk_amount = capital * self.risk.risk_percent / 100.0;
                    let size = if self.risk.stop_loss_points > 0.0 {
                        (risk_amount / self.risk.stop_loss_points).floor()
                    } else {
                        0.0
                    };
                    if size > 0.0 {
                        let trade = Trade::open(
                            next_id,
                            candle,
                            signal,
                            size,
                            self.risk.stop_loss_points,
                            self.risk.take_profit_points,
                        );
                        debug!(
                            "[BT {}] #{} {} {} @ {:.5} size {} SL {:.5} TP {:.5}",
                            candle.timestamp.format("%m-%d %H:%M"),
                            trade.id,
                            trade.playbook,
                            trade.direction,
                            trade.entry_price,
                            trade.size,
                            trade.stop_loss,
                            trade.take_profit,
                        );
                        next_id += 1;
                        still_open.push(trade);
                    } else {
                        counters.zero_size_skips += 1;
                        warn!(
                            "position size rounds to zero (capital ${:.2}, risk ${:.2}), skipping {}",
                            capital, risk_amount, signal.playbook
                        );
                    }
                }
            }
        }

        Ok(ReplayState {
            capital,
            open: still_open,
            closed,
            next_id,
            counters,
        })
    }

    /// Close every remaining trade at the last close.
    fn finish(&self, state: ReplayState) -> ReplayState {
        let ReplayState {
            mut capital,
            open,
            mut closed,
            next_id,
            counters,
        } = state;
        if let Some(last) = self.candles.last() {
            for trade in open {
                let done = trade.close(last.timestamp, last.close, ExitReason::EndOfData);
                capital += done.profit_loss_currency();
                closed.push(done);
            }
        }
        ReplayState {
            capital,
            open: Vec::new(),
            closed,
            next_id,
            counters,
        }
    }
}
