use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(alias = "time")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Missing volume reads as zero.
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn total_range(&self) -> f64 {
        self.high - self.low
    }

    /// Body as a fraction of the full range; zero for a flat candle.
    pub fn body_ratio(&self) -> f64 {
        let range = self.total_range();
        if range > 0.0 {
            self.body() / range
        } else {
            0.0
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// True when the two candles' high/low ranges share no price.
    pub fn gaps_from(&self, prev: &Candle) -> bool {
        self.low > prev.high || self.high < prev.low
    }
}

/// Ordered candle buffer, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The last `n` candles as a borrowed window.
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn into_vec(self) -> Vec<Candle> {
        self.candles
    }

    pub fn push(&mut self, candle: Candle) {
        self.candles.push(candle);
    }

    /// Append and drop the oldest candles beyond `capacity`.
    pub fn push_bounded(&mut self, candle: Candle, capacity: usize) {
        self.candles.push(candle);
        if self.candles.len() > capacity {
            let excess = self.candles.len() - capacity;
            self.candles.drain(..excess);
        }
    }
}

impl std::ops::Index<usize> for CandleSeries {
    type Output = Candle;
    fn index(&self, index: usize) -> &Self::Output {
        &self.candles[index]
    }
}

impl IntoIterator for CandleSeries {
    type Item = Candle;
    type IntoIter = std::vec::IntoIter<Candle>;
    fn into_iter(self) -> Self::IntoIter {
        self.candles.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;
    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

/// Highest high across a window; `NEG_INFINITY` when empty.
pub fn highs_max(candles: &[Candle]) -> f64 {
    candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest low across a window; `INFINITY` when empty.
pub fn lows_min(candles: &[Candle]) -> f64 {
    candles
        .iter()
        .map(|c| c.low)
        .fold(f64::INFINITY, f64::min)
}

/// The last `n` candles of a slice.
pub fn last_n(candles: &[Candle], n: usize) -> &[Candle] {
    &candles[candles.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_candles;

    fn bullish_candle() -> Candle {
        Candle {
            timestamp: Utc::now(),
            open: 100.0,
            high: 115.0,
            low: 95.0,
            close: 110.0,
            volume: 50.0,
        }
    }

    #[test]
    fn candle_body_range_and_ratio() {
        let c = bullish_candle();
        assert!((c.body() - 10.0).abs() < 1e-9);
        assert!((c.total_range() - 20.0).abs() < 1e-9);
        assert!((c.body_ratio() - 0.5).abs() < 1e-9);
        assert!(c.is_bullish());
        assert!(!c.is_bearish());
    }

    #[test]
    fn flat_candle_has_zero_body_ratio() {
        let mut c = bullish_candle();
        c.high = 100.0;
        c.low = 100.0;
        c.close = 100.0;
        assert_eq!(c.body_ratio(), 0.0);
    }

    #[test]
    fn gap_detection() {
        let s = make_candles(&[
            (100.0, 102.0, 99.0, 101.0),
            (103.0, 105.0, 102.5, 104.0),
            (104.0, 105.5, 103.0, 105.0),
        ]);
        assert!(s[1].gaps_from(&s[0]));
        assert!(!s[2].gaps_from(&s[1]));
    }

    #[test]
    fn missing_volume_deserializes_as_zero() {
        let json = r#"{"time":"2024-01-15T12:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let c: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(c.volume, 0.0);
        assert!((c.close - 1.5).abs() < 1e-9);
    }

    #[test]
    fn series_tail_and_bounds() {
        let s = make_candles(&[
            (100.0, 200.0, 50.0, 150.0),
            (150.0, 300.0, 80.0, 250.0),
            (250.0, 280.0, 60.0, 270.0),
        ]);
        assert_eq!(s.tail(2).len(), 2);
        assert_eq!(s.tail(10).len(), 3);
        assert!((highs_max(s.as_slice()) - 300.0).abs() < 1e-9);
        assert!((lows_min(s.as_slice()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn push_bounded_drops_oldest() {
        let source = make_candles(&[
            (1.0, 2.0, 0.5, 1.5),
            (2.0, 3.0, 1.5, 2.5),
            (3.0, 4.0, 2.5, 3.5),
        ]);
        let mut s = CandleSeries::default();
        for c in source {
            s.push_bounded(c, 2);
        }
        assert_eq!(s.len(), 2);
        assert!((s[0].open - 2.0).abs() < 1e-9);
    }
}
