use flowrex::models::{Bias, Session, SignalDirection, SwingType, Trend, Volatility};
use flowrex::strategies::playbooks::PlaybookName;

use crate::analyze_default;
use crate::common::jadecap_bearish_setup;

#[test]
fn context_sees_a_ny_raid_of_the_high() {
    let ctx = analyze_default(&jadecap_bearish_setup()).context;
    assert_eq!(ctx.session, Session::Ny);
    assert_eq!(ctx.htf_trend, Trend::Neutral);
    assert_eq!(ctx.swept_direction(), Some(SwingType::High));
    assert_eq!(ctx.structure_break, Some(Bias::Bearish));
    assert_eq!(ctx.volatility, Volatility::High);
}

#[test]
fn classifies_as_jadecap() {
    let analysis = analyze_default(&jadecap_bearish_setup());
    let signal = analysis.classification.signal.as_ref().unwrap();
    assert_eq!(signal.playbook, PlaybookName::JadeCap);
    assert_eq!(signal.direction, Bias::Bearish);
    assert!((80.0..=90.0).contains(&signal.confidence));

    let out = &analysis.signal;
    assert_eq!(out.direction, SignalDirection::Short);
    assert!(out.reasons.iter().any(|r| r == "NY killzone"));
    assert_eq!(out.symbol.as_deref(), Some("EURUSD"));
}
