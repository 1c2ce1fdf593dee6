//! Fabio: auction-market continuation once price has left balance through
//! a low-volume node with aggressive, confirmed order flow.

use crate::strategies::context::MarketContext;
use crate::strategies::signals::PlaybookSignal;

use super::{clamp_confidence, passes, Guard, PlaybookName};

const BASE_CONFIDENCE: f64 = 75.0;

const GUARDS: &[Guard] = &[
    Guard {
        name: "out_of_balance",
        check: |ctx| !ctx.balance_zones.in_balance,
    },
    Guard {
        name: "low_volume_node",
        check: |ctx| ctx.balance_zones.lvn_detected,
    },
    Guard {
        name: "footprint_aggression",
        check: |ctx| ctx.displacement && ctx.volume_spike,
    },
    Guard {
        name: "orderflow_confirmation",
        check: |ctx| ctx.has_structure_break() && !ctx.htf_trend.is_neutral(),
    },
];

pub fn evaluate(ctx: &MarketContext) -> Option<PlaybookSignal> {
    if !passes(PlaybookName::Fabio, GUARDS, ctx) {
        return None;
    }
    let direction = ctx.htf_trend.bias()?;

    let mut confidence = BASE_CONFIDENCE;
    if ctx.has_aligned_order_block(direction) {
        confidence += 5.0;
    }
    if ctx.has_aligned_fvg(direction) {
        confidence += 5.0;
    }

    Some(PlaybookSignal {
        playbook: PlaybookName::Fabio,
        direction,
        context: format!(
            "Left balance through LVN with displacement; {} order flow confirmed by structure break",
            direction
        ),
        tp_logic: "Target the next high-volume node; exit if price re-enters the balance area"
            .to_string(),
        confidence: clamp_confidence(confidence),
        session: ctx.session,
    })
}
