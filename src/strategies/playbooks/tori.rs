//! Tori: trendline continuation from a balanced base during a killzone.

use crate::core::sessions::is_killzone;
use crate::strategies::context::MarketContext;
use crate::strategies::signals::PlaybookSignal;

use super::{clamp_confidence, passes, Guard, PlaybookName};

const BASE_CONFIDENCE: f64 = 80.0;
const MIN_TOUCHES: usize = 2;

const GUARDS: &[Guard] = &[
    Guard {
        name: "trendline_with_bias",
        check: |ctx| ctx.trendline.exists && !ctx.htf_trend.is_neutral(),
    },
    Guard {
        name: "trendline_respected",
        check: |ctx| ctx.trendline.respected && ctx.trendline.touches >= MIN_TOUCHES,
    },
    Guard {
        name: "balance_zone",
        check: |ctx| ctx.balance_zones.in_balance,
    },
    Guard {
        name: "killzone",
        check: |ctx| is_killzone(ctx.session),
    },
];

pub fn evaluate(ctx: &MarketContext) -> Option<PlaybookSignal> {
    if !passes(PlaybookName::Tori, GUARDS, ctx) {
        return None;
    }
    let direction = ctx.htf_trend.bias()?;

    let mut confidence = BASE_CONFIDENCE;
    if ctx.trendline.touches >= 3 {
        confidence += 5.0;
    }
    if ctx.structure_break == Some(direction) {
        confidence += 5.0;
    }

    Some(PlaybookSignal {
        playbook: PlaybookName::Tori,
        direction,
        context: format!(
            "{} trendline with {} touches respected from balance in {} session",
            direction, ctx.trendline.touches, ctx.session
        ),
        tp_logic: "Target the prior swing extreme; trail below each new trendline touch"
            .to_string(),
        confidence: clamp_confidence(confidence),
        session: ctx.session,
    })
}
