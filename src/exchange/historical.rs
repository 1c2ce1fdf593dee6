use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::backtesting::data_loader::load_candles;
use crate::error::Result;
use crate::exchange::CandleSource;
use crate::models::Candle;

/// Replays pre-loaded candles one at a time. A cursor marks how many
/// candles have been handed out so far.
pub struct HistoricalFeed {
    candles: Vec<Candle>,
    cursor: usize,
}

impl HistoricalFeed {
    /// Candles must be sorted oldest-first.
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles, cursor: 0 }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(load_candles(path)?))
    }

    pub fn remaining(&self) -> usize {
        self.candles.len() - self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn earliest_time(&self) -> Option<DateTime<Utc>> {
        self.candles.first().map(|c| c.timestamp)
    }

    pub fn latest_time(&self) -> Option<DateTime<Utc>> {
        self.candles.last().map(|c| c.timestamp)
    }

    /// Up to `limit` candles with timestamp <= `now`.
    pub fn window_until(&self, now: DateTime<Utc>, limit: usize) -> &[Candle] {
        let end = self.candles.partition_point(|c| c.timestamp <= now);
        let start = end.saturating_sub(limit);
        &self.candles[start..end]
    }
}

#[async_trait]
impl CandleSource for HistoricalFeed {
    async fn next_candle(&mut self) -> Result<Option<Candle>> {
        let next = self.candles.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_candles;

    fn feed() -> HistoricalFeed {
        HistoricalFeed::new(
            make_candles(&[
                (100.0, 101.0, 99.0, 100.5),
                (100.5, 102.0, 100.0, 101.5),
                (101.5, 103.0, 101.0, 102.5),
            ])
            .into_vec(),
        )
    }

    #[tokio::test]
    async fn replays_in_order_then_exhausts() {
        let mut feed = feed();
        let first = feed.next_candle().await.unwrap().unwrap();
        assert!((first.close - 100.5).abs() < 1e-9);
        assert_eq!(feed.remaining(), 2);
        feed.next_candle().await.unwrap();
        feed.next_candle().await.unwrap();
        assert!(feed.next_candle().await.unwrap().is_none());
        assert_eq!(feed.remaining(), 0);

        feed.reset();
        assert_eq!(feed.remaining(), 3);
    }

    #[test]
    fn window_hides_future_candles() {
        let feed = feed();
        let t1 = feed.candles[1].timestamp;
        let window = feed.window_until(t1, 10);
        assert_eq!(window.len(), 2);
        assert_eq!(feed.window_until(t1, 1).len(), 1);
        let before = feed.earliest_time().unwrap() - chrono::Duration::minutes(1);
        assert!(feed.window_until(before, 10).is_empty());
        assert!(feed.latest_time().unwrap() > t1);
    }
}
