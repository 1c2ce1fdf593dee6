use serde::{Deserialize, Serialize};

use crate::core::structure::{find_swing_highs, find_swing_lows};
use crate::models::{Candle, SwingType};

/// How many of the latest candles may carry the sweeping wick.
const SWEEP_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZone {
    pub level: f64,
    #[serde(rename = "type")]
    pub zone_type: SwingType,
    /// Some later candle has traded through the level.
    pub swept: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySweep {
    /// Which side's resting liquidity was taken.
    pub side: SwingType,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LiquidityReading {
    pub zones: Vec<LiquidityZone>,
    pub sweep: Option<LiquiditySweep>,
}

/// A level with the window index it became known at.
struct Level {
    price: f64,
    side: SwingType,
    formed_at: Option<usize>,
}

pub struct LiquidityDetector {
    sweep_window: usize,
}

impl LiquidityDetector {
    pub fn new() -> Self {
        Self {
            sweep_window: SWEEP_WINDOW,
        }
    }

    /// Map swing highs/lows to liquidity zones and look for a recent sweep
    /// of a zone or of the previous day's extremes.
    pub fn detect(
        &self,
        candles: &[Candle],
        previous_day_high: Option<f64>,
        previous_day_low: Option<f64>,
    ) -> LiquidityReading {
        if candles.len() < 2 {
            return LiquidityReading::default();
        }

        let swing_highs = find_swing_highs(candles);
        let swing_lows = find_swing_lows(candles);

        let mut levels: Vec<Level> = Vec::new();
        let mut zones = Vec::with_capacity(swing_highs.len() + swing_lows.len());

        for sh in &swing_highs {
            zones.push(LiquidityZone {
                level: sh.price,
                zone_type: SwingType::High,
                swept: candles[sh.index + 1..].iter().any(|c| c.high > sh.price),
            });
            levels.push(Level {
                price: sh.price,
                side: SwingType::High,
                formed_at: Some(sh.index),
            });
        }
        for sl in &swing_lows {
            zones.push(LiquidityZone {
                level: sl.price,
                zone_type: SwingType::Low,
                swept: candles[sl.index + 1..].iter().any(|c| c.low < sl.price),
            });
            levels.push(Level {
                price: sl.price,
                side: SwingType::Low,
                formed_at: Some(sl.index),
            });
        }
        if let Some(pdh) = previous_day_high {
            levels.push(Level {
                price: pdh,
                side: SwingType::High,
                formed_at: None,
            });
        }
        if let Some(pdl) = previous_day_low {
            levels.push(Level {
                price: pdl,
                side: SwingType::Low,
                formed_at: None,
            });
        }

        LiquidityReading {
            zones,
            sweep: self.find_sweep(candles, &levels),
        }
    }

    /// Newest candle first; high-side levels before low-side ones. The
    /// latest close must sit back inside the swept level.
    fn find_sweep(&self, candles: &[Candle], levels: &[Level]) -> Option<LiquiditySweep> {
        let len = candles.len();
        let last_close = candles[len - 1].close;
        let start = len.saturating_sub(self.sweep_window);

        for i in (start..len).rev() {
            let candle = &candles[i];
            for side in [SwingType::High, SwingType::Low] {
                let hit = levels
                    .iter()
                    .filter(|l| l.side == side)
                    .filter(|l| l.formed_at.map_or(true, |f| f < i))
                    .filter(|l| match side {
                        SwingType::High => candle.high > l.price && last_close < l.price,
                        SwingType::Low => candle.low < l.price && last_close > l.price,
                    })
                    // The most extreme level taken in this wick.
                    .max_by(|a, b| match side {
                        SwingType::High => a.price.total_cmp(&b.price),
                        SwingType::Low => b.price.total_cmp(&a.price),
                    });
                if let Some(level) = hit {
                    return Some(LiquiditySweep {
                        side,
                        level: level.price,
                    });
                }
            }
        }
        None
    }
}

impl Default for LiquidityDetector {
    fn default() -> Self {
        Self::new()
    }
}
