use flowrex::models::{Bias, Session, Trend};
use flowrex::strategies::playbooks::PlaybookName;

use crate::analyze_default;
use crate::common::tori_bullish_setup;

#[test]
fn context_sees_a_three_touch_line_in_balance() {
    let ctx = analyze_default(&tori_bullish_setup()).context;
    assert_eq!(ctx.htf_trend, Trend::Bullish);
    assert!(ctx.trendline.exists && ctx.trendline.respected);
    assert_eq!(ctx.trendline.touches, 3);
    assert!(ctx.balance_zones.in_balance);
    assert_eq!(ctx.session, Session::London);
    assert!(!ctx.volume_spike);
}

#[test]
fn classifies_as_tori() {
    let analysis = analyze_default(&tori_bullish_setup());
    let signal = analysis.classification.signal.as_ref().unwrap();
    assert_eq!(signal.playbook, PlaybookName::Tori);
    assert_eq!(signal.direction, Bias::Bullish);
    assert!((80.0..=90.0).contains(&signal.confidence));
    assert!(analysis
        .signal
        .risk_hints
        .iter()
        .any(|h| h.starts_with("Market in balance")));
}
