use flowrex::models::{Bias, Grade, SignalDirection, SwingType, Trend, Zone};
use flowrex::strategies::playbooks::PlaybookName;

use crate::analyze_default;
use crate::common::nbb_bullish_setup;

#[test]
fn context_carries_the_full_chain() {
    let ctx = analyze_default(&nbb_bullish_setup()).context;
    assert_eq!(ctx.htf_trend, Trend::Bullish);
    assert_eq!(ctx.premium_discount, Some(Zone::Discount));
    assert_eq!(ctx.swept_direction(), Some(SwingType::Low));
    assert_eq!(ctx.structure_break, Some(Bias::Bullish));
    assert!(ctx.volume_spike && ctx.displacement);
    assert!(ctx.ote_level.is_some_and(|l| (l - 0.705).abs() < 1e-9));
}

#[test]
fn classifies_as_nbb() {
    let analysis = analyze_default(&nbb_bullish_setup());
    let signal = analysis.classification.signal.as_ref().unwrap();
    assert_eq!(signal.playbook, PlaybookName::Nbb);
    assert_eq!(signal.direction, Bias::Bullish);
    assert!((85.0..=95.0).contains(&signal.confidence));
    assert_eq!(analysis.classification.priority, 1);
    assert_eq!(analysis.classification.backup, None);
}

#[test]
fn normalized_signal() {
    let out = analyze_default(&nbb_bullish_setup()).signal;
    assert_eq!(out.direction, SignalDirection::Long);
    assert_eq!(out.grade, Grade::A);
    assert!(out.confidence <= 100.0);
    assert_eq!(out.reasons[0], "NBB playbook matched");
    assert!(out.reasons.iter().any(|r| r.starts_with("Triple confluence")));
    assert!(out.reasons.iter().any(|r| r == "London killzone"));
}
