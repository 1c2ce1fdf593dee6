use serde::{Deserialize, Serialize};

use crate::models::candle::{highs_max, last_n, lows_min};
use crate::models::{Candle, Trend, Zone};

/// Candles that define the dealing range for PO3 and OTE.
pub const DEALING_RANGE_LOOKBACK: usize = 10;

const OTE_MIN: f64 = 0.62;
const OTE_MAX: f64 = 0.79;
/// Canonical OTE levels and the half-width of the band snapped onto each.
const OTE_LEVELS: [f64; 3] = [0.62, 0.705, 0.79];
const OTE_SNAP_TOLERANCE: f64 = 0.025;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DealingRange {
    pub high: f64,
    pub low: f64,
    pub equilibrium: f64,
}

impl DealingRange {
    /// High/low of the last ten candles; `None` on an empty window.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }
        let window = last_n(candles, DEALING_RANGE_LOOKBACK);
        let high = highs_max(window);
        let low = lows_min(window);
        Some(Self {
            high,
            low,
            equilibrium: (high + low) / 2.0,
        })
    }

    pub fn size(&self) -> f64 {
        self.high - self.low
    }

    /// Premium above equilibrium, discount below; exactly at it is neither.
    pub fn classify(&self, price: f64) -> Option<Zone> {
        if price > self.equilibrium {
            Some(Zone::Premium)
        } else if price < self.equilibrium {
            Some(Zone::Discount)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PremiumDiscountReading {
    pub equilibrium: f64,
    pub zone: Option<Zone>,
    pub po3_zone_present: bool,
    pub price_at_po3: bool,
}

pub fn detect_premium_discount(candles: &[Candle]) -> PremiumDiscountReading {
    let (Some(range), Some(last)) = (DealingRange::from_candles(candles), candles.last()) else {
        return PremiumDiscountReading::default();
    };
    let zone = range.classify(last.close);
    PremiumDiscountReading {
        equilibrium: range.equilibrium,
        zone,
        po3_zone_present: range.size() > 0.0,
        price_at_po3: zone.is_some(),
    }
}

/// Retracement of the latest close into the dealing range, measured from
/// the high for a bullish bias and from the low for a bearish one.
///
/// Only fractions in [0.62, 0.79] qualify. Values within 0.025 of a
/// canonical level snap onto it; anything between the bands is returned
/// as the raw fraction.
pub fn detect_ote(candles: &[Candle], bias: Trend) -> Option<f64> {
    let range = DealingRange::from_candles(candles)?;
    let close = candles.last()?.close;
    let size = range.size();
    if size <= 0.0 {
        return None;
    }

    let fraction = match bias {
        Trend::Bullish => (range.high - close) / size,
        Trend::Bearish => (close - range.low) / size,
        Trend::Neutral => return None,
    };
    if !(OTE_MIN..=OTE_MAX).contains(&fraction) {
        return None;
    }

    Some(snap_ote(fraction))
}

fn snap_ote(fraction: f64) -> f64 {
    OTE_LEVELS
        .iter()
        .copied()
        .find(|level| (fraction - level).abs() <= OTE_SNAP_TOLERANCE)
        .unwrap_or(fraction)
}
