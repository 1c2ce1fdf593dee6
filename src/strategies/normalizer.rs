use crate::core::sessions::{is_killzone, is_late_ny};
use crate::models::{Grade, Session, SignalDirection, Volatility};
use crate::strategies::context::MarketContext;
use crate::strategies::playbooks::PlaybookName;
use crate::strategies::signals::{ClassifierOutput, FlowrexSignal, SignalMetadata};

pub const NO_MATCH_REASON: &str = "No playbook conditions met";

const LATE_SESSION_PENALTY: f64 = 5.0;
const CHOPPY_PENALTY: f64 = 10.0;
const ASIAN_PENALTY: f64 = 5.0;
const COUNTER_TREND_PENALTY: f64 = 15.0;
const TRIPLE_CONFLUENCE_BONUS: f64 = 10.0;
const VOLUME_BONUS: f64 = 5.0;
const TRENDLINE_BONUS: f64 = 5.0;

/// Turn a classification into the graded signal handed to callers.
pub fn normalize(
    ctx: &MarketContext,
    output: &ClassifierOutput,
    metadata: &SignalMetadata,
) -> FlowrexSignal {
    let Some(signal) = &output.signal else {
        return FlowrexSignal {
            direction: SignalDirection::Neutral,
            confidence: 0.0,
            grade: Grade::C,
            playbook: None,
            primary_playbook: None,
            backup_playbook: None,
            reasons: vec![NO_MATCH_REASON.to_string()],
            risk_hints: Vec::new(),
            timeframe: metadata.timeframe,
            instrument: metadata.instrument.clone(),
            symbol: metadata.symbol.clone(),
            created_at: ctx.timestamp,
        };
    };

    let direction = signal.direction;
    let mut confidence = signal.confidence;
    let mut reasons = vec![format!("{} playbook matched", signal.playbook)];
    let mut risk_hints = Vec::new();

    let htf_bias = ctx.htf_trend.bias();
    if htf_bias == Some(direction) {
        reasons.push(format!("Aligned with {} HTF trend", ctx.htf_trend));
    }
    if let Some(sweep) = ctx.liquidity_sweep {
        reasons.push(format!("Liquidity sweep of {} at {:.5}", sweep.side, sweep.level));
    }
    if let Some(brk) = ctx.structure_break {
        reasons.push(format!("{} structure break", capitalize(&brk.to_string())));
    }
    if let Some(ote) = ctx.ote_level {
        reasons.push(format!("OTE retrace at {ote:.3}"));
    }
    if is_killzone(ctx.session) {
        reasons.push(format!("{} killzone", session_label(ctx.session)));
    }
    if ctx.volume_spike && ctx.displacement {
        confidence += VOLUME_BONUS;
        reasons.push("Volume spike with displacement".to_string());
    }
    if ctx.has_liquidity_sweep() && ctx.has_structure_break() && ctx.ote_retrace() {
        confidence += TRIPLE_CONFLUENCE_BONUS;
        reasons.push("Triple confluence: sweep + structure break + OTE".to_string());
    }
    if ctx.trendline.exists && ctx.trendline.respected {
        confidence += TRENDLINE_BONUS;
        reasons.push(format!(
            "Respected trendline ({} touches)",
            ctx.trendline.touches
        ));
    }

    if is_late_ny(ctx.session, ctx.timestamp) {
        confidence -= LATE_SESSION_PENALTY;
        risk_hints.push("Late NY session: liquidity thinning".to_string());
    }
    if ctx.volatility == Volatility::High && !ctx.displacement {
        confidence -= CHOPPY_PENALTY;
        risk_hints.push("Choppy: high volatility without displacement".to_string());
    }
    if ctx.session == Session::Asian {
        confidence -= ASIAN_PENALTY;
        risk_hints.push("Asian session: lower participation".to_string());
    }
    if htf_bias.is_some_and(|b| b != direction) {
        confidence -= COUNTER_TREND_PENALTY;
        risk_hints.push(format!("Counter-trend against {} HTF", ctx.htf_trend));
    }
    if ctx.balance_zones.in_balance {
        risk_hints.push("Market in balance: expect rotation".to_string());
    }
    if !ctx.volume_spike {
        risk_hints.push("No volume confirmation".to_string());
    }
    if ctx.volatility == Volatility::Low && signal.playbook == PlaybookName::Nbb {
        risk_hints.push("Low volatility for NBB expansion".to_string());
    }

    let confidence = confidence.clamp(0.0, 100.0);

    FlowrexSignal {
        direction: direction.into(),
        confidence,
        grade: Grade::from_confidence(confidence),
        playbook: Some(signal.playbook),
        primary_playbook: Some(signal.playbook),
        backup_playbook: output.backup,
        reasons,
        risk_hints,
        timeframe: metadata.timeframe,
        instrument: metadata.instrument.clone(),
        symbol: metadata.symbol.clone(),
        created_at: ctx.timestamp,
    }
}

fn session_label(session: Session) -> &'static str {
    match session {
        Session::Asian => "Asian",
        Session::London => "London",
        Session::Ny => "NY",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
