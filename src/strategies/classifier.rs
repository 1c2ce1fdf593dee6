use tracing::debug;

use crate::config::{PlaybookConfig, PlaybookSettings};
use crate::strategies::context::MarketContext;
use crate::strategies::signals::{ClassifierOutput, PlaybookSignal};

/// Evaluate one playbook and apply its confidence floor.
pub fn check_playbook(cfg: &PlaybookConfig, ctx: &MarketContext) -> Option<PlaybookSignal> {
    let signal = cfg.name.evaluate(ctx)?;
    if signal.confidence < cfg.min_confidence {
        debug!(
            playbook = %cfg.name,
            confidence = signal.confidence,
            min_confidence = cfg.min_confidence,
            "signal below confidence floor, rejected"
        );
        return None;
    }
    Some(signal)
}

/// Enabled playbooks in ascending priority; the first accepted signal wins
/// and the next accepted one is kept as the backup.
pub fn classify(ctx: &MarketContext, settings: &PlaybookSettings) -> ClassifierOutput {
    let mut accepted = settings
        .ordered()
        .into_iter()
        .filter_map(|cfg| check_playbook(cfg, ctx).map(|signal| (cfg.priority, signal)));

    let Some((priority, signal)) = accepted.next() else {
        return ClassifierOutput::none(ctx.timestamp);
    };
    let backup = accepted.next().map(|(_, s)| s.playbook);

    debug!(
        playbook = %signal.playbook,
        priority,
        direction = %signal.direction,
        confidence = signal.confidence,
        "playbook matched"
    );

    ClassifierOutput {
        signal: Some(signal),
        priority,
        timestamp: ctx.timestamp,
        backup,
    }
}
