use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::balance::{detect_balance, BalanceZones};
use crate::core::liquidity::{LiquidityDetector, LiquiditySweep, LiquidityZone};
use crate::core::market_maker::{detect_phase, MmmPhase};
use crate::core::pd_arrays::{
    detect_breaker, detect_fvg, detect_order_block, BreakerBlock, FairValueGap, OrderBlock,
};
use crate::core::premium_discount::{detect_ote, detect_premium_discount};
use crate::core::sessions::detect_session;
use crate::core::structure::MarketStructure;
use crate::core::trend::detect_trend;
use crate::core::trendline::{detect_trendline, TrendlineReading};
use crate::core::volume::{detect_volume, is_high_volatility};
use crate::error::{Error, Result};
use crate::models::{Bias, Candle, Session, SwingType, Trend, Volatility, Zone};

/// One snapshot of every detector's reading for the latest candle.
/// Built fresh on each evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub timestamp: DateTime<Utc>,
    pub session: Session,
    pub htf_trend: Trend,
    pub trend_strength: f64,

    pub price: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,

    pub equilibrium: f64,
    pub premium_discount: Option<Zone>,
    #[serde(rename = "po3ZonePresent")]
    pub po3_zone_present: bool,
    #[serde(rename = "priceAtPO3")]
    pub price_at_po3: bool,

    pub liquidity_sweep: Option<LiquiditySweep>,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub structure_break: Option<Bias>,

    pub volume_spike: bool,
    pub displacement: bool,

    pub ote_level: Option<f64>,
    pub trendline: TrendlineReading,
    pub balance_zones: BalanceZones,
    pub volatility: Volatility,

    pub mmm_phase: MmmPhase,
    pub breaker: Option<BreakerBlock>,
    pub fair_value_gap: Option<FairValueGap>,
    pub order_block: Option<OrderBlock>,

    pub previous_day_high: Option<f64>,
    pub previous_day_low: Option<f64>,
}

impl MarketContext {
    pub fn has_liquidity_sweep(&self) -> bool {
        self.liquidity_sweep.is_some()
    }

    pub fn swept_direction(&self) -> Option<SwingType> {
        self.liquidity_sweep.map(|s| s.side)
    }

    pub fn has_structure_break(&self) -> bool {
        self.structure_break.is_some()
    }

    pub fn ote_retrace(&self) -> bool {
        self.ote_level.is_some()
    }

    /// An unfilled fair value gap pointing the same way as `bias`.
    pub fn has_aligned_fvg(&self, bias: Bias) -> bool {
        self.fair_value_gap
            .is_some_and(|g| g.unfilled && g.direction == bias)
    }

    pub fn has_aligned_order_block(&self, bias: Bias) -> bool {
        self.order_block.is_some_and(|ob| ob.direction == bias)
    }
}

/// Run every detector once over `candles` and assemble the snapshot.
pub fn build_context(
    candles: &[Candle],
    previous_day_high: Option<f64>,
    previous_day_low: Option<f64>,
) -> Result<MarketContext> {
    let last = candles.last().ok_or(Error::EmptyCandles)?;

    let trend = detect_trend(candles);
    let liquidity = LiquidityDetector::new().detect(candles, previous_day_high, previous_day_low);
    let volume = detect_volume(candles);
    let pd = detect_premium_discount(candles);
    let shift = MarketStructure::new().detect_shift(candles);

    let volatility = if is_high_volatility(candles) {
        Volatility::High
    } else {
        Volatility::Low
    };

    Ok(MarketContext {
        timestamp: last.timestamp,
        session: detect_session(candles),
        htf_trend: trend.trend,
        trend_strength: trend.strength,
        price: last.close,
        high: last.high,
        low: last.low,
        volume: last.volume,
        equilibrium: pd.equilibrium,
        premium_discount: pd.zone,
        po3_zone_present: pd.po3_zone_present,
        price_at_po3: pd.price_at_po3,
        liquidity_sweep: liquidity.sweep,
        liquidity_zones: liquidity.zones,
        structure_break: shift.map(|s| s.direction),
        volume_spike: volume.spike,
        displacement: volume.displacement,
        ote_level: detect_ote(candles, trend.trend),
        trendline: detect_trendline(candles, trend.trend),
        balance_zones: detect_balance(candles),
        volatility,
        mmm_phase: detect_phase(candles),
        breaker: detect_breaker(candles),
        fair_value_gap: detect_fvg(candles),
        order_block: detect_order_block(candles),
        previous_day_high,
        previous_day_low,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_bullish_trend, make_candles};

    #[test]
    fn empty_candles_is_an_error() {
        assert!(matches!(
            build_context(&[], None, None),
            Err(Error::EmptyCandles)
        ));
    }

    #[test]
    fn single_candle_degrades_to_neutral_readings() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.5)]);
        let ctx = build_context(candles.as_slice(), None, None).unwrap();
        assert_eq!(ctx.htf_trend, Trend::Neutral);
        assert!(!ctx.has_liquidity_sweep());
        assert!(!ctx.has_structure_break());
        assert!(!ctx.ote_retrace());
        assert!(!ctx.trendline.exists);
        assert_eq!(ctx.mmm_phase, MmmPhase::None);
        assert!((ctx.price - 100.5).abs() < 1e-9);
    }

    #[test]
    fn snapshot_reflects_latest_candle() {
        let candles = make_bullish_trend(6, 100.0);
        let ctx = build_context(candles.as_slice(), Some(200.0), Some(90.0)).unwrap();
        let last = candles.last().unwrap();
        assert_eq!(ctx.timestamp, last.timestamp);
        assert_eq!(ctx.htf_trend, Trend::Bullish);
        assert!((ctx.high - last.high).abs() < 1e-9);
        assert_eq!(ctx.previous_day_high, Some(200.0));
        assert_eq!(ctx.session, Session::London);
    }

    #[test]
    fn building_twice_is_identical() {
        let candles = make_bullish_trend(12, 100.0);
        let a = build_context(candles.as_slice(), Some(250.0), Some(95.0)).unwrap();
        let b = build_context(candles.as_slice(), Some(250.0), Some(95.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sweep_and_ote_accessors_follow_their_values() {
        let candles = make_bullish_trend(8, 100.0);
        let ctx = build_context(candles.as_slice(), None, None).unwrap();
        assert_eq!(ctx.has_liquidity_sweep(), ctx.swept_direction().is_some());
        assert_eq!(ctx.ote_retrace(), ctx.ote_level.is_some());
    }
}
