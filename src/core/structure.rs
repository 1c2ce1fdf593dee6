use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::candle::last_n;
use crate::models::{Bias, Candle, SwingType};

/// Default window for market structure shifts.
pub const MSS_LOOKBACK: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub swing_type: SwingType,
    pub price: f64,
    /// Position inside the window the swing was found in.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureShift {
    pub direction: Bias,
    /// The swing level the close broke through.
    pub level: f64,
}

/// 3-candle swing highs: a high strictly above both neighbours.
pub fn find_swing_highs(candles: &[Candle]) -> Vec<SwingPoint> {
    if candles.len() < 3 {
        return Vec::new();
    }
    (1..candles.len() - 1)
        .filter(|&i| candles[i].high > candles[i - 1].high && candles[i].high > candles[i + 1].high)
        .map(|i| SwingPoint {
            swing_type: SwingType::High,
            price: candles[i].high,
            index: i,
            timestamp: candles[i].timestamp,
        })
        .collect()
}

/// 3-candle swing lows: a low strictly below both neighbours.
pub fn find_swing_lows(candles: &[Candle]) -> Vec<SwingPoint> {
    if candles.len() < 3 {
        return Vec::new();
    }
    (1..candles.len() - 1)
        .filter(|&i| candles[i].low < candles[i - 1].low && candles[i].low < candles[i + 1].low)
        .map(|i| SwingPoint {
            swing_type: SwingType::Low,
            price: candles[i].low,
            index: i,
            timestamp: candles[i].timestamp,
        })
        .collect()
}

pub struct MarketStructure {
    pub lookback: usize,
}

impl MarketStructure {
    pub fn new() -> Self {
        Self::with_lookback(MSS_LOOKBACK)
    }

    pub fn with_lookback(lookback: usize) -> Self {
        Self { lookback }
    }

    /// A close beyond the most recent swing high (bullish) or swing low
    /// (bearish) inside the lookback window.
    pub fn detect_shift(&self, candles: &[Candle]) -> Option<StructureShift> {
        let window = last_n(candles, self.lookback);
        let last = window.last()?;
        if window.len() < 3 {
            return None;
        }

        if let Some(sh) = find_swing_highs(window).last() {
            if last.close > sh.price {
                return Some(StructureShift {
                    direction: Bias::Bullish,
                    level: sh.price,
                });
            }
        }

        if let Some(sl) = find_swing_lows(window).last() {
            if last.close < sl.price {
                return Some(StructureShift {
                    direction: Bias::Bearish,
                    level: sl.price,
                });
            }
        }

        None
    }
}

impl Default for MarketStructure {
    fn default() -> Self {
        Self::new()
    }
}
