use chrono::{DateTime, Duration, Utc};

use crate::config::{Config, RiskConfig};
use crate::core::balance::BalanceZones;
use crate::core::market_maker::MmmPhase;
use crate::core::trendline::TrendlineReading;
use crate::models::{Candle, CandleSeries, Session, Timeframe, Trend, Volatility};
use crate::strategies::context::MarketContext;

/// 2024-01-15T12:00:00Z, inside the London session.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Create candles from (open, high, low, close) tuples with auto-incrementing 1m timestamps.
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> CandleSeries {
    make_candles_at(base_time(), Duration::minutes(1), data)
}

/// Same as `make_candles` but starting at `base` and spaced by `step`.
pub fn make_candles_at(
    base: DateTime<Utc>,
    step: Duration,
    data: &[(f64, f64, f64, f64)],
) -> CandleSeries {
    let with_volume: Vec<(f64, f64, f64, f64, f64)> = data
        .iter()
        .map(|&(o, h, l, c)| (o, h, l, c, 100.0))
        .collect();
    build(base, step, &with_volume)
}

/// Create candles from (open, high, low, close, volume) tuples.
pub fn make_candles_with_volume(data: &[(f64, f64, f64, f64, f64)]) -> CandleSeries {
    build(base_time(), Duration::minutes(1), data)
}

fn build(base: DateTime<Utc>, step: Duration, data: &[(f64, f64, f64, f64, f64)]) -> CandleSeries {
    let candles: Vec<Candle> = data
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| Candle {
            timestamp: base + step * i as i32,
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
    let data: Vec<(f64, f64, f64, f64)> = (0..n)
        .map(|i| {
            let open = start + i as f64 * 10.0;
            let close = open + 8.0;
            (open, close + 2.0, open - 1.0, close)
        })
        .collect();
    make_candles(&data)
}

/// Create n falling (bearish) candles starting from `start` price.
pub fn make_bearish_trend(n: usize, start: f64) -> CandleSeries {
    let data: Vec<(f64, f64, f64, f64)> = (0..n)
        .map(|i| {
            let open = start - i as f64 * 10.0;
            let close = open - 8.0;
            (open, open + 1.0, close - 2.0, close)
        })
        .collect();
    make_candles(&data)
}

/// A context where nothing fires: London session, neutral trend, no sweep,
/// no break, no OTE. Tests switch on the fields they care about.
pub fn quiet_context() -> MarketContext {
    MarketContext {
        timestamp: base_time(),
        session: Session::London,
        htf_trend: Trend::Neutral,
        trend_strength: 0.0,
        price: 100.0,
        high: 100.5,
        low: 99.5,
        volume: 100.0,
        equilibrium: 100.0,
        premium_discount: None,
        po3_zone_present: false,
        price_at_po3: false,
        liquidity_sweep: None,
        liquidity_zones: Vec::new(),
        structure_break: None,
        volume_spike: false,
        displacement: false,
        ote_level: None,
        trendline: TrendlineReading::default(),
        balance_zones: BalanceZones::default(),
        volatility: Volatility::Low,
        mmm_phase: MmmPhase::None,
        breaker: None,
        fair_value_gap: None,
        order_block: None,
        previous_day_high: None,
        previous_day_low: None,
    }
}

/// A Config suitable for testing: defaults with no playbook file.
pub fn default_test_config() -> Config {
    Config {
        instrument: "forex".to_string(),
        symbol: Some("EURUSD".to_string()),
        timeframe: Timeframe::M5,
        log_level: "error".to_string(),
        starting_capital: 10_000.0,
        risk: RiskConfig::default(),
        playbook_config: None,
    }
}
