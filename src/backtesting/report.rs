use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::backtesting::trade::{ExitReason, Trade};
use crate::core::kelly::{kelly_fraction, KellyResult};
use crate::strategies::playbooks::PlaybookName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percent, 0..=100.
    pub win_rate: f64,
    /// Infinite when there are wins and no losses; `null` in JSON.
    #[serde(with = "unbounded")]
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub total_pnl_points: f64,
    pub total_pnl_currency: f64,
}

/// JSON has no infinity, so an unbounded ratio travels as `null`.
mod unbounded {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub expectancy: f64,
    pub payoff_ratio: f64,
    pub kelly: KellyResult,
    pub roi_pct: f64,
    pub average_trade: f64,
    /// Mean over standard deviation of per-trade PnL.
    pub sharpe: f64,
    pub exit_reasons: BTreeMap<ExitReason, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookBreakdown {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub candles_processed: usize,
    pub signals_generated: usize,
    /// Signals dropped by the playbook filter.
    pub signals_filtered: usize,
    pub zero_size_skips: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Closed trades in entry order.
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    pub stats: Stats,
    pub breakdown: BTreeMap<PlaybookName, PlaybookBreakdown>,
    pub starting_capital: f64,
    pub final_capital: f64,
    pub counters: Counters,
}

impl SimulationResult {
    /// Pure reduction over the closed trades.
    pub fn from_trades(trades: Vec<Trade>, starting_capital: f64, counters: Counters) -> Self {
        let total_pnl: f64 = trades.iter().map(Trade::profit_loss_currency).sum();
        Self::from_replay(trades, starting_capital, starting_capital + total_pnl, counters)
    }

    /// Like [`Self::from_trades`], but keeps the capital a replay actually
    /// ended with.
    pub fn from_replay(
        mut trades: Vec<Trade>,
        starting_capital: f64,
        final_capital: f64,
        counters: Counters,
    ) -> Self {
        trades.sort_by_key(|t| t.id);

        let metrics = compute_metrics(&trades, starting_capital);
        let stats = compute_stats(&trades, &metrics, starting_capital, final_capital);
        let breakdown = compute_breakdown(&trades);

        Self {
            trades,
            metrics,
            stats,
            breakdown,
            starting_capital,
            final_capital,
            counters,
        }
    }

    pub fn print_summary(&self) {
        let m = &self.metrics;
        let s = &self.stats;
        println!("\n{}", "=".repeat(70));
        println!("  BACKTEST REPORT");
        println!("{}", "=".repeat(70));
        println!();
        println!("  PERFORMANCE");
        println!("  ───────────────────────────────────");
        println!("  Initial:     ${:.2}", self.starting_capital);
        println!("  Final:       ${:.2}", self.final_capital);
        println!("  PnL:         ${:+.2}", m.total_pnl_currency);
        println!("  Points:      {:+.2}", m.total_pnl_points);
        println!("  ROI:         {:+.1}%", s.roi_pct);
        println!();
        println!("  TRADES");
        println!("  ───────────────────────────────────");
        println!("  Total:       {}", m.total_trades);
        println!("  Win/Loss:    {} / {}", m.winning_trades, m.losing_trades);
        println!("  Win Rate:    {:.1}%", m.win_rate);
        println!("  Avg Win:     ${:+.2}", m.average_win);
        println!("  Avg Loss:    ${:+.2}", m.average_loss);
        println!("  Largest:     ${:+.2} / ${:+.2}", m.largest_win, m.largest_loss);
        println!("  Streaks:     {}W / {}L", m.max_consecutive_wins, m.max_consecutive_losses);
        if m.profit_factor.is_finite() {
            println!("  Profit Factor: {:.2}", m.profit_factor);
        } else {
            println!("  Profit Factor: no losses");
        }
        println!();
        println!("  EDGE");
        println!("  ───────────────────────────────────");
        println!("  Expectancy:  ${:+.2}", s.expectancy);
        println!("  Payoff:      {:.2}", s.payoff_ratio);
        println!(
            "  Kelly:       {:.1}% full / {:.1}% half{}",
            s.kelly.full_kelly * 100.0,
            s.kelly.half_kelly * 100.0,
            if s.kelly.sufficient_sample { "" } else { " (small sample)" }
        );
        println!("  Sharpe:      {:.2}", s.sharpe);
        println!();
        println!("  RISK");
        println!("  ───────────────────────────────────");
        println!("  Max DD:      ${:.2} ({:.1}%)", m.max_drawdown, m.max_drawdown_pct);
        for (reason, count) in &s.exit_reasons {
            println!("  {:<12} {}", reason.to_string(), count);
        }
        println!();
        println!("  SIGNALS");
        println!("  ───────────────────────────────────");
        println!("  Candles:     {}", self.counters.candles_processed);
        println!("  Generated:   {}", self.counters.signals_generated);
        println!("  Filtered:    {}", self.counters.signals_filtered);
        println!("  Zero size:   {}", self.counters.zero_size_skips);

        if !self.breakdown.is_empty() {
            println!();
            println!("  BY PLAYBOOK");
            println!("  ───────────────────────────────────");
            for (playbook, b) in &self.breakdown {
                println!(
                    "  {:>7}: {} trades | WR {:.0}% | PnL ${:+.2} | Avg ${:+.2}",
                    playbook.as_str(),
                    b.trades,
                    b.win_rate,
                    b.total_pnl,
                    b.avg_pnl
                );
            }
        }

        println!("{}", "=".repeat(70));
    }
}

fn compute_metrics(trades: &[Trade], starting_capital: f64) -> Metrics {
    let total_trades = trades.len();
    let wins: Vec<f64> = trades.iter().filter(|t| t.is_win()).map(Trade::profit_loss_currency).collect();
    let losses: Vec<f64> = trades.iter().filter(|t| !t.is_win()).map(Trade::profit_loss_currency).collect();

    let gross_win: f64 = wins.iter().sum();
    let gross_loss: f64 = losses.iter().sum::<f64>().abs();
    let profit_factor = if gross_loss > 0.0 {
        gross_win / gross_loss
    } else if !wins.is_empty() {
        f64::INFINITY
    } else {
        0.0
    };

    let (max_drawdown, max_drawdown_pct) = drawdown(trades, starting_capital);
    let (max_consecutive_wins, max_consecutive_losses) = streaks(trades);

    Metrics {
        total_trades,
        winning_trades: wins.len(),
        losing_trades: losses.len(),
        win_rate: pct(wins.len(), total_trades),
        profit_factor,
        average_win: mean(&wins),
        average_loss: mean(&losses),
        largest_win: wins.iter().copied().fold(0.0, f64::max),
        largest_loss: losses.iter().copied().fold(0.0, f64::min),
        max_drawdown,
        max_drawdown_pct,
        max_consecutive_wins,
        max_consecutive_losses,
        total_pnl_points: trades.iter().map(Trade::profit_loss_points).sum(),
        total_pnl_currency: wins.iter().sum::<f64>() + losses.iter().sum::<f64>(),
    }
}

fn compute_stats(trades: &[Trade], m: &Metrics, starting_capital: f64, final_capital: f64) -> Stats {
    let n = trades.len();
    let win_p = m.win_rate / 100.0;
    let expectancy = if n > 0 {
        win_p * m.average_win - (1.0 - win_p) * m.average_loss.abs()
    } else {
        0.0
    };
    let payoff_ratio = if m.average_loss < 0.0 {
        m.average_win / m.average_loss.abs()
    } else {
        0.0
    };

    let mut exit_reasons = BTreeMap::new();
    for reason in trades.iter().filter_map(Trade::exit_reason) {
        *exit_reasons.entry(reason).or_insert(0) += 1;
    }

    Stats {
        expectancy,
        payoff_ratio,
        kelly: kelly_fraction(trades, None),
        roi_pct: if starting_capital > 0.0 {
            (final_capital - starting_capital) / starting_capital * 100.0
        } else {
            0.0
        },
        average_trade: if n > 0 { m.total_pnl_currency / n as f64 } else { 0.0 },
        sharpe: trade_sharpe(trades),
        exit_reasons,
    }
}

fn compute_breakdown(trades: &[Trade]) -> BTreeMap<PlaybookName, PlaybookBreakdown> {
    let mut breakdown: BTreeMap<PlaybookName, PlaybookBreakdown> = BTreeMap::new();
    for trade in trades {
        let entry = breakdown.entry(trade.playbook).or_default();
        entry.trades += 1;
        entry.total_pnl += trade.profit_loss_currency();
        if trade.is_win() {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
    }
    for stats in breakdown.values_mut() {
        stats.win_rate = pct(stats.wins, stats.trades);
        stats.avg_pnl = if stats.trades > 0 {
            stats.total_pnl / stats.trades as f64
        } else {
            0.0
        };
    }
    breakdown
}

/// Peak-to-trough of realised equity, walking trades in closing order.
fn drawdown(trades: &[Trade], starting_capital: f64) -> (f64, f64) {
    let mut by_close: Vec<&Trade> = trades.iter().collect();
    by_close.sort_by_key(|t| (t.exit.as_ref().map(|e| e.exit_time), t.id));

    let mut equity = starting_capital;
    let mut peak = starting_capital;
    let mut max_dd = 0.0f64;
    let mut max_dd_pct = 0.0f64;
    for trade in by_close {
        equity += trade.profit_loss_currency();
        if equity > peak {
            peak = equity;
        }
        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
            max_dd_pct = if peak > 0.0 { dd / peak * 100.0 } else { 0.0 };
        }
    }
    (max_dd, max_dd_pct)
}

fn streaks(trades: &[Trade]) -> (usize, usize) {
    let (mut best_w, mut best_l, mut cur_w, mut cur_l) = (0, 0, 0, 0);
    for trade in trades {
        if trade.is_win() {
            cur_w += 1;
            cur_l = 0;
        } else {
            cur_l += 1;
            cur_w = 0;
        }
        best_w = best_w.max(cur_w);
        best_l = best_l.max(cur_l);
    }
    (best_w, best_l)
}

fn trade_sharpe(trades: &[Trade]) -> f64 {
    if trades.len() < 2 {
        return 0.0;
    }
    let returns: Vec<f64> = trades.iter().map(Trade::profit_loss_currency).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }
    mean / std_dev
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn pct(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}
