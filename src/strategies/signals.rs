use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Bias, Grade, Session, SignalDirection, Timeframe};
use crate::strategies::playbooks::PlaybookName;

/// Raw output of a single playbook whose guard chain passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookSignal {
    #[serde(rename = "playbookName")]
    pub playbook: PlaybookName,
    pub direction: Bias,
    /// Human-readable rationale.
    pub context: String,
    pub tp_logic: String,
    /// 0..=100
    pub confidence: f64,
    pub session: Session,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierOutput {
    pub signal: Option<PlaybookSignal>,
    /// Configured rank of the matched playbook, 0 when nothing matched.
    pub priority: u8,
    pub timestamp: DateTime<Utc>,
    /// Next playbook in priority order that also produced an accepted signal.
    pub backup: Option<PlaybookName>,
}

impl ClassifierOutput {
    pub fn none(timestamp: DateTime<Utc>) -> Self {
        Self {
            signal: None,
            priority: 0,
            timestamp,
            backup: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMetadata {
    pub instrument: String,
    pub timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Graded, risk-annotated signal handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowrexSignal {
    pub direction: SignalDirection,
    pub confidence: f64,
    pub grade: Grade,
    pub playbook: Option<PlaybookName>,
    pub primary_playbook: Option<PlaybookName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_playbook: Option<PlaybookName>,
    pub reasons: Vec<String>,
    pub risk_hints: Vec<String>,
    pub timeframe: Timeframe,
    pub instrument: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FlowrexSignal {
    pub fn is_actionable(&self) -> bool {
        self.direction != SignalDirection::Neutral
    }
}
