#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use flowrex::models::{Candle, CandleSeries, Timeframe};
use flowrex::strategies::signals::SignalMetadata;

/// 2024-01-15 at `hour`:00 UTC.
pub fn at_hour(hour: u32) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&format!("2024-01-15T{hour:02}:00:00Z"))
        .unwrap()
        .with_timezone(&Utc)
}

/// Create candles from (open, high, low, close, volume) tuples with 1m spacing from `base`.
pub fn make_candles_from(base: DateTime<Utc>, data: &[(f64, f64, f64, f64, f64)]) -> CandleSeries {
    let candles: Vec<Candle> = data
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
        })
        .collect();

    CandleSeries::new(candles)
}

/// Create n rising (bullish) candles starting from `start` price.
pub fn make_bullish_trend(n: usize, start: f64) -> CandleSeries {
    let data: Vec<(f64, f64, f64, f64, f64)> = (0..n)
        .map(|i| {
            let open = start + i as f64 * 10.0;
            let close = open + 8.0;
            (open, close + 2.0, open - 1.0, close, 100.0)
        })
        .collect();
    make_candles_from(at_hour(12), &data)
}

pub fn metadata() -> SignalMetadata {
    SignalMetadata {
        instrument: "forex".to_string(),
        timeframe: Timeframe::M1,
        symbol: Some("EURUSD".to_string()),
    }
}

/// London. Sell-off from 108 to a 100 low, a small swing high at 102.3,
/// a dip under the 100.8 swing low, then five rising bars ending in a
/// 400-volume displacement close at 102.4: 70% back into an 8-point range.
pub fn nbb_bullish_setup() -> CandleSeries {
    make_candles_from(
        at_hour(12),
        &[
            (107.5, 108.0, 104.0, 104.5, 100.0),
            (104.5, 105.0, 101.5, 102.0, 100.0),
            (102.0, 102.2, 100.8, 101.0, 100.0),
            (101.0, 102.3, 100.9, 101.8, 100.0),
            (101.8, 101.9, 100.0, 100.5, 100.0),
            (100.5, 102.0, 100.2, 101.6, 100.0),
            (101.6, 102.1, 100.4, 101.5, 100.0),
            (101.5, 102.2, 100.6, 101.0, 100.0),
            (101.0, 102.6, 100.8, 102.4, 400.0),
        ],
    )
}

/// London. Nine narrow-bodied bars inside a 1.3-point range; swing lows
/// at 98.7 and 98.8 carry an ascending line and the last five bars step
/// higher. Flat volume.
pub fn tori_bullish_setup() -> CandleSeries {
    make_candles_from(
        at_hour(12),
        &[
            (99.3, 99.7, 98.9, 99.2, 100.0),
            (99.1, 99.5, 98.7, 99.0, 100.0),
            (99.3, 99.7, 98.9, 99.4, 100.0),
            (99.4, 99.8, 99.0, 99.3, 100.0),
            (99.2, 99.6, 98.8, 99.3, 100.0),
            (99.3, 99.7, 98.9, 99.4, 100.0),
            (99.4, 99.8, 99.0, 99.5, 100.0),
            (99.5, 99.9, 99.1, 99.6, 100.0),
            (99.6, 100.0, 99.2, 99.7, 100.0),
        ],
    )
}

/// London. Rising lows throughout, one early swing high at 103, and a
/// final 400-volume bar that gaps above the prior high and closes 105.8.
pub fn fabio_bullish_setup() -> CandleSeries {
    make_candles_from(
        at_hour(12),
        &[
            (99.5, 100.5, 99.0, 100.0, 100.0),
            (100.0, 101.0, 99.5, 100.5, 100.0),
            (100.5, 103.0, 100.0, 102.5, 100.0),
            (102.5, 102.8, 100.2, 101.0, 100.0),
            (101.0, 102.9, 100.4, 102.5, 100.0),
            (102.5, 103.2, 100.6, 103.0, 100.0),
            (103.0, 103.5, 100.8, 103.3, 100.0),
            (103.3, 103.8, 101.0, 103.6, 100.0),
            (104.0, 106.0, 103.9, 105.8, 400.0),
        ],
    )
}

/// NY from 15:00. A 102 swing high and 98.5 swing low, then a 400-volume
/// bar that wicks to 102.5 and closes 95.
pub fn jadecap_bearish_setup() -> CandleSeries {
    make_candles_from(
        at_hour(15),
        &[
            (99.5, 100.6, 99.3, 100.2, 100.0),
            (100.2, 100.8, 99.6, 100.4, 100.0),
            (100.4, 100.9, 99.8, 100.0, 100.0),
            (100.0, 101.0, 99.0, 100.5, 100.0),
            (100.5, 102.0, 100.0, 101.5, 100.0),
            (101.5, 101.6, 99.5, 100.0, 100.0),
            (100.0, 100.5, 98.5, 99.0, 100.0),
            (99.3, 101.0, 99.2, 100.8, 100.0),
            (100.8, 102.5, 94.8, 95.0, 400.0),
        ],
    )
}
