//! Price-delivery arrays: breaker blocks, fair value gaps and order blocks.
//! Each detector reports only the most recent instance in the window.

use serde::{Deserialize, Serialize};

use crate::core::volume::DISPLACEMENT_BODY_RATIO;
use crate::models::{Bias, Candle};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakerBlock {
    pub direction: Bias,
    /// The broken extreme of the candle two bars before the break.
    pub level: f64,
    /// Window index of the breaking candle.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    pub direction: Bias,
    pub top: f64,
    pub bottom: f64,
    pub unfilled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub direction: Bias,
    pub high: f64,
    pub low: f64,
}

/// Scanning backward, the first candle whose close breaks the high (low)
/// of the candle two bars earlier while the candle in between failed to.
pub fn detect_breaker(candles: &[Candle]) -> Option<BreakerBlock> {
    if candles.len() < 3 {
        return None;
    }
    for i in (2..candles.len()).rev() {
        let origin = &candles[i - 2];
        let middle = &candles[i - 1];
        let current = &candles[i];

        if current.close > origin.high && middle.close <= origin.high {
            return Some(BreakerBlock {
                direction: Bias::Bullish,
                level: origin.high,
                index: i,
            });
        }
        if current.close < origin.low && middle.close >= origin.low {
            return Some(BreakerBlock {
                direction: Bias::Bearish,
                level: origin.low,
                index: i,
            });
        }
    }
    None
}

/// Most recent three-candle gap. A gap stays unfilled while no close from
/// the third candle on has traded back into it.
pub fn detect_fvg(candles: &[Candle]) -> Option<FairValueGap> {
    if candles.len() < 3 {
        return None;
    }
    for i in (2..candles.len()).rev() {
        let c1 = &candles[i - 2];
        let c3 = &candles[i];
        let later = &candles[i..];

        if c1.high < c3.low {
            let (bottom, top) = (c1.high, c3.low);
            return Some(FairValueGap {
                direction: Bias::Bullish,
                top,
                bottom,
                unfilled: later.iter().all(|c| c.close >= top),
            });
        }
        if c1.low > c3.high {
            let (bottom, top) = (c3.high, c1.low);
            return Some(FairValueGap {
                direction: Bias::Bearish,
                top,
                bottom,
                unfilled: later.iter().all(|c| c.close <= bottom),
            });
        }
    }
    None
}

/// The last opposite-coloured candle before a displacement candle.
pub fn detect_order_block(candles: &[Candle]) -> Option<OrderBlock> {
    if candles.len() < 2 {
        return None;
    }
    for i in (0..candles.len() - 1).rev() {
        let base = &candles[i];
        let mover = &candles[i + 1];
        if mover.body_ratio() < DISPLACEMENT_BODY_RATIO {
            continue;
        }
        let direction = if mover.is_bullish() && base.is_bearish() {
            Bias::Bullish
        } else if mover.is_bearish() && base.is_bullish() {
            Bias::Bearish
        } else {
            continue;
        };
        return Some(OrderBlock {
            direction,
            high: base.high,
            low: base.low,
        });
    }
    None
}
