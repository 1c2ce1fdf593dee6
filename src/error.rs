use thiserror::Error;

use crate::strategies::playbooks::PlaybookName;

#[derive(Debug, Error)]
pub enum Error {
    #[error("candle series is empty")]
    EmptyCandles,

    #[error("need at least {required} candles, got {actual}")]
    InsufficientCandles { required: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("priority {priority} is used by both {first} and {second}")]
    DuplicatePriority {
        priority: u8,
        first: PlaybookName,
        second: PlaybookName,
    },

    #[error("{playbook}: priority {priority} outside 1..=10")]
    PriorityOutOfRange { playbook: PlaybookName, priority: u8 },

    #[error("{playbook}: minConfidence {value} outside 0..=100")]
    MinConfidenceOutOfRange { playbook: PlaybookName, value: f64 },

    #[error("no configuration for playbook {0}")]
    MissingPlaybook(PlaybookName),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
