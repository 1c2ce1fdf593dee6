use serde::{Deserialize, Serialize};

/// Below this many trades the fraction is reported but flagged as unreliable.
const MIN_SAMPLE_SIZE: usize = 20;
const KELLY_MULTIPLIER: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KellyResult {
    pub full_kelly: f64,
    /// Half of the full fraction, floored at zero.
    pub half_kelly: f64,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub payoff_ratio: f64,
    pub edge: f64,
    pub sample_size: usize,
    pub sufficient_sample: bool,
}

/// Anything with a realised PnL and a tag to group by (the playbook name).
pub trait HasPnl {
    fn pnl(&self) -> f64;
    fn tag(&self) -> &str;
}

/// Kelly fraction over closed trades, optionally restricted to one tag.
/// A trade with PnL <= 0 counts as a loss.
pub fn kelly_fraction<T: HasPnl>(trades: &[T], tag: Option<&str>) -> KellyResult {
    let trades: Vec<&T> = match tag {
        Some(t) => trades.iter().filter(|tr| tr.tag() == t).collect(),
        None => trades.iter().collect(),
    };
    if trades.is_empty() {
        return KellyResult::default();
    }

    let total = trades.len() as f64;
    let wins: Vec<f64> = trades.iter().map(|t| t.pnl()).filter(|p| *p > 0.0).collect();
    let losses: Vec<f64> = trades.iter().map(|t| t.pnl()).filter(|p| *p <= 0.0).collect();

    let p = wins.len() as f64 / total;
    let q = 1.0 - p;

    let avg_win = mean(&wins);
    let avg_loss = mean(&losses).abs();

    // With no losing PnL the fraction tends to the win rate.
    let (b, full_kelly) = if avg_loss > 0.0 {
        let b = avg_win / avg_loss;
        let k = if b > 0.0 { (b * p - q) / b } else { -q };
        (b, k)
    } else {
        (0.0, p)
    };
    let edge = if avg_loss > 0.0 { b * p - q } else { p };

    KellyResult {
        full_kelly: round6(full_kelly),
        half_kelly: round6((full_kelly * KELLY_MULTIPLIER).max(0.0)),
        win_rate: round4(p),
        loss_rate: round4(q),
        payoff_ratio: round4(b),
        edge: round4(edge),
        sample_size: trades.len(),
        sufficient_sample: trades.len() >= MIN_SAMPLE_SIZE,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

fn round6(x: f64) -> f64 {
    (x * 1000000.0).round() / 1000000.0
}
