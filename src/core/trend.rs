use serde::{Deserialize, Serialize};

use crate::models::candle::last_n;
use crate::models::{Candle, Trend};

const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub trend: Trend,
    /// 0..=100
    pub strength: f64,
}

impl TrendReading {
    fn neutral() -> Self {
        Self {
            trend: Trend::Neutral,
            strength: 0.0,
        }
    }
}

/// Classify the last five candles: bullish when every candle makes a
/// strictly higher high and higher low than its predecessor, bearish
/// for strictly lower highs and lows.
pub fn detect_trend(candles: &[Candle]) -> TrendReading {
    if candles.len() < TREND_WINDOW {
        return TrendReading::neutral();
    }
    let window = last_n(candles, TREND_WINDOW);

    let higher = window
        .windows(2)
        .all(|w| w[1].high > w[0].high && w[1].low > w[0].low);
    let lower = window
        .windows(2)
        .all(|w| w[1].high < w[0].high && w[1].low < w[0].low);

    let trend = if higher {
        Trend::Bullish
    } else if lower {
        Trend::Bearish
    } else {
        Trend::Neutral
    };

    let first = &window[0];
    let last = &window[window.len() - 1];
    let first_range = first.total_range();
    let strength = if first_range > 0.0 {
        ((last.close - first.close).abs() / first_range * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    TrendReading { trend, strength }
}
