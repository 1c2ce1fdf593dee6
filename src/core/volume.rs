use serde::{Deserialize, Serialize};

use crate::models::Candle;

const VOLUME_LOOKBACK: usize = 10;
const SPIKE_MULTIPLIER: f64 = 1.5;
/// Body share of the range that makes a candle a displacement.
pub const DISPLACEMENT_BODY_RATIO: f64 = 0.7;

const VOLATILITY_LOOKBACK: usize = 10;
const VOLATILITY_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct VolumeReading {
    pub spike: bool,
    pub displacement: bool,
    /// Current volume over the trailing average; zero when unknown.
    pub ratio: f64,
}

/// Spike when the latest volume beats 1.5x the average of up to ten
/// preceding bars; displacement additionally needs a body of at least
/// 70% of the candle's range.
pub fn detect_volume(candles: &[Candle]) -> VolumeReading {
    let Some((current, history)) = candles.split_last() else {
        return VolumeReading::default();
    };
    if history.is_empty() {
        return VolumeReading::default();
    }

    let trailing = &history[history.len().saturating_sub(VOLUME_LOOKBACK)..];
    let avg = trailing.iter().map(|c| c.volume).sum::<f64>() / trailing.len() as f64;

    let spike = current.volume > avg * SPIKE_MULTIPLIER;
    let displacement = spike && current.body_ratio() >= DISPLACEMENT_BODY_RATIO;
    let ratio = if avg > 0.0 { current.volume / avg } else { 0.0 };

    VolumeReading {
        spike,
        displacement,
        ratio,
    }
}

/// Range expansion of the latest candle against the preceding ones.
pub fn is_high_volatility(candles: &[Candle]) -> bool {
    let Some((current, history)) = candles.split_last() else {
        return false;
    };
    if history.is_empty() {
        return false;
    }
    let trailing = &history[history.len().saturating_sub(VOLATILITY_LOOKBACK)..];
    let avg_range = trailing.iter().map(|c| c.total_range()).sum::<f64>() / trailing.len() as f64;
    current.total_range() > avg_range * VOLATILITY_MULTIPLIER
}
