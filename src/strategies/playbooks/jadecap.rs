//! JadeCap: NY-session reversal after a liquidity raid.

use crate::models::{Bias, Session, SwingType, Volatility};
use crate::strategies::context::MarketContext;
use crate::strategies::signals::PlaybookSignal;

use super::{clamp_confidence, passes, Guard, PlaybookName};

const BASE_CONFIDENCE: f64 = 80.0;

const GUARDS: &[Guard] = &[
    Guard {
        name: "liquidity_sweep",
        check: |ctx| ctx.has_liquidity_sweep(),
    },
    Guard {
        name: "ny_session",
        check: |ctx| ctx.session == Session::Ny,
    },
    Guard {
        name: "mss_displacement",
        check: |ctx| ctx.has_structure_break() && ctx.displacement,
    },
    Guard {
        name: "volatility_expansion",
        check: |ctx| ctx.volatility == Volatility::High && ctx.volume_spike,
    },
];

pub fn evaluate(ctx: &MarketContext) -> Option<PlaybookSignal> {
    if !passes(PlaybookName::JadeCap, GUARDS, ctx) {
        return None;
    }
    let sweep = ctx.liquidity_sweep?;
    let direction = match sweep.side {
        SwingType::Low => Bias::Bullish,
        SwingType::High => Bias::Bearish,
    };

    let mut confidence = BASE_CONFIDENCE;
    if ctx.ote_retrace() {
        confidence += 5.0;
    }
    if ctx.has_aligned_fvg(direction) {
        confidence += 5.0;
    }

    Some(PlaybookSignal {
        playbook: PlaybookName::JadeCap,
        direction,
        context: format!(
            "NY raid of {} liquidity at {:.5}, reversal confirmed by MSS and displacement",
            sweep.side, sweep.level
        ),
        tp_logic: "Target the opposite side of the session range; move stop to entry at 1R"
            .to_string(),
        confidence: clamp_confidence(confidence),
        session: ctx.session,
    })
}
