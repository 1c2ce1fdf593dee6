use flowrex::models::{Bias, SignalDirection};
use flowrex::strategies::playbooks::PlaybookName;

use crate::analyze_default;
use crate::common::fabio_bullish_setup;

#[test]
fn context_sees_an_imbalance_breakout() {
    let ctx = analyze_default(&fabio_bullish_setup()).context;
    assert!(!ctx.balance_zones.in_balance);
    assert!(ctx.balance_zones.lvn_detected);
    assert!(ctx.displacement && ctx.volume_spike);
    assert_eq!(ctx.structure_break, Some(Bias::Bullish));
    assert!(ctx.has_aligned_fvg(Bias::Bullish));
}

#[test]
fn classifies_as_fabio() {
    let analysis = analyze_default(&fabio_bullish_setup());
    let signal = analysis.classification.signal.as_ref().unwrap();
    assert_eq!(signal.playbook, PlaybookName::Fabio);
    assert_eq!(signal.direction, Bias::Bullish);
    assert!((75.0..=85.0).contains(&signal.confidence));
    assert_eq!(analysis.signal.direction, SignalDirection::Long);
}
