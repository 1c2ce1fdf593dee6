use serde::{Deserialize, Serialize};

use crate::core::structure::{find_swing_highs, find_swing_lows, SwingPoint};
use crate::models::{Candle, Trend};

/// Max distance, as a fraction of the swing price, for the latest
/// extreme to count as a touch of the line.
const RESPECT_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendlineReading {
    pub exists: bool,
    pub touches: usize,
    pub respected: bool,
}

/// Ascending lows under a bullish bias, descending highs under a bearish
/// one. The trailing monotonic run of swing points must hold at least two
/// points; the current candle counts as one more touch.
pub fn detect_trendline(candles: &[Candle], bias: Trend) -> TrendlineReading {
    let last = match candles.last() {
        Some(c) if candles.len() >= 3 => c,
        _ => return TrendlineReading::default(),
    };

    let (swings, current_extreme): (Vec<SwingPoint>, f64) = match bias {
        Trend::Bullish => (find_swing_lows(candles), last.low),
        Trend::Bearish => (find_swing_highs(candles), last.high),
        Trend::Neutral => return TrendlineReading::default(),
    };

    let run = trailing_run(&swings, bias);
    if run < 2 {
        return TrendlineReading::default();
    }

    let anchor = swings[swings.len() - 1].price;
    let respected = anchor > 0.0 && (current_extreme - anchor).abs() / anchor <= RESPECT_TOLERANCE;

    TrendlineReading {
        exists: true,
        touches: run + 1,
        respected,
    }
}

/// Number of swing points in the monotonic run ending at the last swing.
fn trailing_run(swings: &[SwingPoint], bias: Trend) -> usize {
    if swings.is_empty() {
        return 0;
    }
    let mut run = 1;
    for pair in swings.windows(2).rev() {
        let moving = match bias {
            Trend::Bullish => pair[1].price > pair[0].price,
            Trend::Bearish => pair[1].price < pair[0].price,
            Trend::Neutral => false,
        };
        if !moving {
            break;
        }
        run += 1;
    }
    run
}
