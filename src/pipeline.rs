use crate::config::PlaybookSettings;
use crate::error::{Error, Result};
use crate::models::Candle;
use crate::strategies::classifier::classify;
use crate::strategies::context::{build_context, MarketContext};
use crate::strategies::normalizer::normalize;
use crate::strategies::signals::{ClassifierOutput, FlowrexSignal, SignalMetadata};

/// Fewest candles any top-level analysis accepts.
pub const MIN_ANALYSIS_CANDLES: usize = 3;

/// Every intermediate of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub context: MarketContext,
    pub classification: ClassifierOutput,
    pub signal: FlowrexSignal,
}

/// Context, classification and normalization over one candle window.
pub fn analyze(
    candles: &[Candle],
    previous_day_high: Option<f64>,
    previous_day_low: Option<f64>,
    settings: &PlaybookSettings,
    metadata: &SignalMetadata,
) -> Result<Analysis> {
    if candles.len() < MIN_ANALYSIS_CANDLES {
        return Err(Error::InsufficientCandles {
            required: MIN_ANALYSIS_CANDLES,
            actual: candles.len(),
        });
    }
    let context = build_context(candles, previous_day_high, previous_day_low)?;
    let classification = classify(&context, settings);
    let signal = normalize(&context, &classification, metadata);
    Ok(Analysis {
        context,
        classification,
        signal,
    })
}
