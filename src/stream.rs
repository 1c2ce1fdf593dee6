use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::PlaybookSettings;
use crate::error::Result;
use crate::exchange::CandleSource;
use crate::models::{Candle, CandleSeries, Timeframe};
use crate::pipeline::{analyze, MIN_ANALYSIS_CANDLES};
use crate::strategies::signals::{FlowrexSignal, SignalMetadata};

/// Identity of one live analysis stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamKey {
    pub provider: String,
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.symbol, self.timeframe)
    }
}

/// A trailing candle buffer for one key plus the settings needed to
/// analyze it. Streams share nothing with each other.
pub struct AnalysisStream {
    key: StreamKey,
    buffer: CandleSeries,
    capacity: usize,
    settings: PlaybookSettings,
    metadata: SignalMetadata,
    previous_day_high: Option<f64>,
    previous_day_low: Option<f64>,
}

impl AnalysisStream {
    pub fn new(
        key: StreamKey,
        capacity: usize,
        settings: PlaybookSettings,
        metadata: SignalMetadata,
    ) -> Self {
        Self {
            key,
            buffer: CandleSeries::default(),
            capacity: capacity.max(MIN_ANALYSIS_CANDLES),
            settings,
            metadata,
            previous_day_high: None,
            previous_day_low: None,
        }
    }

    pub fn key(&self) -> &StreamKey {
        &self.key
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn set_previous_day(&mut self, high: Option<f64>, low: Option<f64>) {
        self.previous_day_high = high;
        self.previous_day_low = low;
    }

    /// Append a closed candle and analyze the buffer once it is deep enough.
    /// Candles not strictly newer than the last buffered one are dropped.
    pub fn push(&mut self, candle: Candle) -> Result<Option<FlowrexSignal>> {
        if let Some(last) = self.buffer.last() {
            if candle.timestamp <= last.timestamp {
                warn!(
                    stream = %self.key,
                    ts = %candle.timestamp,
                    last = %last.timestamp,
                    "stale or duplicate candle dropped"
                );
                return Ok(None);
            }
            let step = (candle.timestamp - last.timestamp).to_std().ok();
            if step.is_some_and(|s| s > self.key.timeframe.as_duration()) {
                debug!(
                    stream = %self.key,
                    from = %last.timestamp,
                    to = %candle.timestamp,
                    "gap in candle feed"
                );
            }
        }
        self.buffer.push_bounded(candle, self.capacity);

        if self.buffer.len() < MIN_ANALYSIS_CANDLES {
            return Ok(None);
        }
        let analysis = analyze(
            self.buffer.as_slice(),
            self.previous_day_high,
            self.previous_day_low,
            &self.settings,
            &self.metadata,
        )?;
        Ok(Some(analysis.signal))
    }
}

/// Drive `stream` from `source` until it is exhausted, returning every
/// non-neutral signal in arrival order.
pub async fn run_stream<S>(stream: &mut AnalysisStream, source: &mut S) -> Result<Vec<FlowrexSignal>>
where
    S: CandleSource + ?Sized,
{
    let mut signals = Vec::new();
    while let Some(candle) = source.next_candle().await? {
        if let Some(signal) = stream.push(candle)? {
            if signal.is_actionable() {
                info!(
                    stream = %stream.key(),
                    direction = %signal.direction,
                    grade = %signal.grade,
                    confidence = signal.confidence,
                    playbook = ?signal.playbook,
                    "signal"
                );
                signals.push(signal);
            }
        }
    }
    Ok(signals)
}
