//! NBB: trend continuation after a sweep of the opposing side, entered on
//! an OTE retrace inside the discount (bullish) or premium (bearish) half.

use crate::models::{Bias, SwingType, Zone};
use crate::strategies::context::MarketContext;
use crate::strategies::signals::PlaybookSignal;

use super::{clamp_confidence, passes, Guard, PlaybookName};

const BASE_CONFIDENCE: f64 = 85.0;
const OTE_SWEET_SPOT: f64 = 0.705;

const GUARDS: &[Guard] = &[
    Guard {
        name: "htf_bias",
        check: |ctx| ctx.htf_trend.bias().is_some(),
    },
    Guard {
        name: "po3_zone",
        check: |ctx| {
            ctx.po3_zone_present
                && ctx.price_at_po3
                && ctx
                    .htf_trend
                    .bias()
                    .is_some_and(|b| ctx.premium_discount == Some(Zone::entry_zone_for(b)))
        },
    },
    Guard {
        name: "opposing_sweep",
        check: |ctx| match (ctx.htf_trend.bias(), ctx.swept_direction()) {
            (Some(Bias::Bullish), Some(SwingType::Low)) => true,
            (Some(Bias::Bearish), Some(SwingType::High)) => true,
            _ => false,
        },
    },
    Guard {
        name: "aligned_structure_break",
        check: |ctx| ctx.structure_break.is_some() && ctx.structure_break == ctx.htf_trend.bias(),
    },
    Guard {
        name: "volume_displacement",
        check: |ctx| ctx.volume_spike && ctx.displacement,
    },
    Guard {
        name: "ote_retrace",
        check: |ctx| ctx.ote_retrace(),
    },
];

pub fn evaluate(ctx: &MarketContext) -> Option<PlaybookSignal> {
    if !passes(PlaybookName::Nbb, GUARDS, ctx) {
        return None;
    }
    let direction = ctx.htf_trend.bias()?;
    let ote = ctx.ote_level?;
    let sweep = ctx.liquidity_sweep?;

    let mut confidence = BASE_CONFIDENCE;
    if (ote - OTE_SWEET_SPOT).abs() < 1e-9 {
        confidence += 5.0;
    }
    if ctx.has_aligned_fvg(direction) {
        confidence += 5.0;
    }

    let target = match direction {
        Bias::Bullish => "buy-side liquidity above the range high",
        Bias::Bearish => "sell-side liquidity below the range low",
    };

    Some(PlaybookSignal {
        playbook: PlaybookName::Nbb,
        direction,
        context: format!(
            "HTF {} | swept {} liquidity at {:.5} | MSS {} | OTE {:.3}",
            ctx.htf_trend, sweep.side, sweep.level, direction, ote
        ),
        tp_logic: format!("Target {target}; partials at 1:2 R"),
        confidence: clamp_confidence(confidence),
        session: ctx.session,
    })
}
