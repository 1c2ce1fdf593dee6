use serde::{Deserialize, Serialize};

use crate::models::candle::{highs_max, last_n, lows_min};
use crate::models::Candle;

const BALANCE_LOOKBACK: usize = 10;
const BALANCE_BODY_RATIO: f64 = 0.35;
/// Max total range, as a fraction of the mid price, for a balanced window.
const BALANCE_RANGE_PCT: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BalanceZones {
    pub in_balance: bool,
    /// Consecutive candles with non-overlapping ranges: a low-volume node.
    pub lvn_detected: bool,
}

pub fn detect_balance(candles: &[Candle]) -> BalanceZones {
    if candles.len() < 2 {
        return BalanceZones::default();
    }
    let window = last_n(candles, BALANCE_LOOKBACK);

    let avg_body_ratio =
        window.iter().map(Candle::body_ratio).sum::<f64>() / window.len() as f64;
    let high = highs_max(window);
    let low = lows_min(window);
    let mid = (high + low) / 2.0;
    let tight = mid > 0.0 && (high - low) / mid < BALANCE_RANGE_PCT;

    let lvn_detected = window.windows(2).any(|pair| pair[1].gaps_from(&pair[0]));

    BalanceZones {
        in_balance: avg_body_ratio < BALANCE_BODY_RATIO && tight,
        lvn_detected,
    }
}
