//! The four playbooks. Each one is an AND-only chain of named guards over
//! the market context followed by a signal builder that runs only when
//! every guard passed.

pub mod fabio;
pub mod jadecap;
pub mod nbb;
pub mod tori;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::error::ConfigError;
use crate::strategies::context::MarketContext;
use crate::strategies::signals::PlaybookSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlaybookName {
    #[serde(rename = "NBB")]
    Nbb,
    Tori,
    Fabio,
    JadeCap,
}

impl PlaybookName {
    pub const ALL: [PlaybookName; 4] = [
        PlaybookName::Nbb,
        PlaybookName::Tori,
        PlaybookName::Fabio,
        PlaybookName::JadeCap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybookName::Nbb => "NBB",
            PlaybookName::Tori => "Tori",
            PlaybookName::Fabio => "Fabio",
            PlaybookName::JadeCap => "JadeCap",
        }
    }

    /// Run this playbook's guard chain and, on a full pass, build its signal.
    pub fn evaluate(self, ctx: &MarketContext) -> Option<PlaybookSignal> {
        match self {
            PlaybookName::Nbb => nbb::evaluate(ctx),
            PlaybookName::Tori => tori::evaluate(ctx),
            PlaybookName::Fabio => fabio::evaluate(ctx),
            PlaybookName::JadeCap => jadecap::evaluate(ctx),
        }
    }
}

impl fmt::Display for PlaybookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaybookName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaybookName::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "playbook".to_string(),
                value: s.to_string(),
            })
    }
}

/// A single named predicate in a playbook's chain.
pub struct Guard {
    pub name: &'static str,
    pub check: fn(&MarketContext) -> bool,
}

/// True when every guard passes. Stops at the first failure.
pub(crate) fn passes(playbook: PlaybookName, guards: &[Guard], ctx: &MarketContext) -> bool {
    for guard in guards {
        if !(guard.check)(ctx) {
            trace!(playbook = %playbook, guard = guard.name, "guard failed");
            return false;
        }
    }
    true
}

/// Clamp a built confidence into 0..=100.
pub(crate) fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
