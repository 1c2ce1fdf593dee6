use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::candle::{highs_max, last_n, lows_min};
use crate::models::Candle;

const MMM_WINDOW: usize = 5;
const ACCUMULATION_BODY_RATIO: f64 = 0.3;
const DISTRIBUTION_BODY_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum MmmPhase {
    None,
    Accumulation,
    /// Wick beyond the prior range that closed back inside.
    Manipulation { swept_level: f64 },
    Distribution,
}

impl fmt::Display for MmmPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmmPhase::None => write!(f, "none"),
            MmmPhase::Accumulation => write!(f, "accumulation"),
            MmmPhase::Manipulation { .. } => write!(f, "manipulation"),
            MmmPhase::Distribution => write!(f, "distribution"),
        }
    }
}

/// Market-maker-model phase over the last five candles, checked in the
/// order accumulation, manipulation, distribution.
pub fn detect_phase(candles: &[Candle]) -> MmmPhase {
    if candles.len() < MMM_WINDOW {
        return MmmPhase::None;
    }
    let window = last_n(candles, MMM_WINDOW);
    let Some((latest, prior)) = window.split_last() else {
        return MmmPhase::None;
    };

    let avg_body_ratio =
        window.iter().map(Candle::body_ratio).sum::<f64>() / window.len() as f64;
    if avg_body_ratio < ACCUMULATION_BODY_RATIO {
        return MmmPhase::Accumulation;
    }

    let prior_high = highs_max(prior);
    let prior_low = lows_min(prior);
    if latest.high > prior_high && latest.close < prior_high {
        return MmmPhase::Manipulation {
            swept_level: prior_high,
        };
    }
    if latest.low < prior_low && latest.close > prior_low {
        return MmmPhase::Manipulation {
            swept_level: prior_low,
        };
    }

    if latest.body_ratio() > DISTRIBUTION_BODY_RATIO {
        return MmmPhase::Distribution;
    }

    MmmPhase::None
}
