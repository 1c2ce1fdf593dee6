use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::models::Timeframe;
use crate::strategies::playbooks::PlaybookName;
use crate::strategies::signals::SignalMetadata;

const MIN_PRIORITY: u8 = 1;
const MAX_PRIORITY: u8 = 10;
const DEFAULT_MIN_CONFIDENCE: f64 = 60.0;

/// Position sizing and replay parameters for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Percent of current capital risked per trade.
    pub risk_percent: f64,
    pub stop_loss_points: f64,
    pub take_profit_points: f64,
    pub max_positions: usize,
    /// Trailing candles fed to the context builder at each step.
    pub lookback: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_percent: 1.0,
            stop_loss_points: 10.0,
            take_profit_points: 20.0,
            max_positions: 1,
            lookback: 50,
        }
    }
}

/// One playbook's switch, rank and acceptance floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookConfig {
    pub name: PlaybookName,
    pub enabled: bool,
    pub priority: u8,
    pub min_confidence: f64,
}

/// Per-playbook entry as written in a playbook config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaybookFileEntry {
    #[serde(default = "default_enabled")]
    enabled: bool,
    priority: u8,
    #[serde(default = "default_min_confidence")]
    min_confidence: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

/// The full playbook table. Passed explicitly to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlaybookSettings")]
pub struct PlaybookSettings {
    playbooks: Vec<PlaybookConfig>,
}

/// Unchecked wire shape of [`PlaybookSettings`].
#[derive(Deserialize)]
struct RawPlaybookSettings {
    playbooks: Vec<PlaybookConfig>,
}

impl TryFrom<RawPlaybookSettings> for PlaybookSettings {
    type Error = ConfigError;

    fn try_from(raw: RawPlaybookSettings) -> Result<Self, ConfigError> {
        Self::new(raw.playbooks)
    }
}

impl Default for PlaybookSettings {
    fn default() -> Self {
        let playbooks = PlaybookName::ALL
            .into_iter()
            .zip(1u8..)
            .map(|(name, priority)| PlaybookConfig {
                name,
                enabled: true,
                priority,
                min_confidence: DEFAULT_MIN_CONFIDENCE,
            })
            .collect();
        Self { playbooks }
    }
}

impl PlaybookSettings {
    /// Build and validate from explicit entries.
    pub fn new(playbooks: Vec<PlaybookConfig>) -> Result<Self, ConfigError> {
        let settings = Self { playbooks };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse `{ "NBB": {"enabled": true, "priority": 1, "minConfidence": 60}, ... }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<PlaybookName, PlaybookFileEntry> = serde_json::from_str(json)?;
        let mut playbooks = Vec::with_capacity(PlaybookName::ALL.len());
        for name in PlaybookName::ALL {
            let entry = entries
                .get(&name)
                .ok_or(ConfigError::MissingPlaybook(name))?;
            playbooks.push(PlaybookConfig {
                name,
                enabled: entry.enabled,
                priority: entry.priority,
                min_confidence: entry.min_confidence,
            });
        }
        Ok(Self::new(playbooks)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in PlaybookName::ALL {
            if !self.playbooks.iter().any(|p| p.name == name) {
                return Err(ConfigError::MissingPlaybook(name));
            }
        }

        let mut seen: BTreeMap<u8, PlaybookName> = BTreeMap::new();
        for p in &self.playbooks {
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&p.priority) {
                return Err(ConfigError::PriorityOutOfRange {
                    playbook: p.name,
                    priority: p.priority,
                });
            }
            if !(0.0..=100.0).contains(&p.min_confidence) {
                return Err(ConfigError::MinConfidenceOutOfRange {
                    playbook: p.name,
                    value: p.min_confidence,
                });
            }
            if let Some(first) = seen.insert(p.priority, p.name) {
                return Err(ConfigError::DuplicatePriority {
                    priority: p.priority,
                    first,
                    second: p.name,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: PlaybookName) -> Option<&PlaybookConfig> {
        self.playbooks.iter().find(|p| p.name == name)
    }

    /// Enabled playbooks in ascending priority order.
    pub fn ordered(&self) -> Vec<&PlaybookConfig> {
        let mut enabled: Vec<&PlaybookConfig> =
            self.playbooks.iter().filter(|p| p.enabled).collect();
        enabled.sort_by_key(|p| p.priority);
        enabled
    }

    pub fn set_enabled(&mut self, name: PlaybookName, enabled: bool) {
        if let Some(p) = self.playbooks.iter_mut().find(|p| p.name == name) {
            p.enabled = enabled;
        }
    }

    /// Swap in a new priority table; rejected if it breaks validation.
    pub fn with_priorities(&self, priorities: &[(PlaybookName, u8)]) -> Result<Self, ConfigError> {
        let mut playbooks = self.playbooks.clone();
        for &(name, priority) in priorities {
            if let Some(p) = playbooks.iter_mut().find(|p| p.name == name) {
                p.priority = priority;
            }
        }
        Self::new(playbooks)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaybookConfig> {
        self.playbooks.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub instrument: String,
    pub symbol: Option<String>,
    pub timeframe: Timeframe,
    pub log_level: String,
    pub starting_capital: f64,
    pub risk: RiskConfig,
    /// Optional JSON file with per-playbook settings.
    pub playbook_config: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let risk_defaults = RiskConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeframe = match non_empty("FLOWREX_TIMEFRAME") {
            Some(raw) => Timeframe::from_str_loose(&raw).unwrap_or_else(|| {
                warn!(key = "FLOWREX_TIMEFRAME", value = %raw, "unrecognised timeframe, using 5m");
                Timeframe::M5
            }),
            None => Timeframe::M5,
        };

        Config {
            instrument: non_empty("FLOWREX_INSTRUMENT").unwrap_or_else(|| "forex".to_string()),
            symbol: non_empty("FLOWREX_SYMBOL"),
            timeframe,
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            starting_capital: parse_or(&lookup, "STARTING_CAPITAL", 10_000.0),
            risk: RiskConfig {
                risk_percent: parse_or(&lookup, "RISK_PERCENT", risk_defaults.risk_percent),
                stop_loss_points: parse_or(
                    &lookup,
                    "STOP_LOSS_POINTS",
                    risk_defaults.stop_loss_points,
                ),
                take_profit_points: parse_or(
                    &lookup,
                    "TAKE_PROFIT_POINTS",
                    risk_defaults.take_profit_points,
                ),
                max_positions: parse_or(&lookup, "MAX_POSITIONS", risk_defaults.max_positions),
                lookback: parse_or(&lookup, "LOOKBACK_CANDLES", risk_defaults.lookback),
            },
            playbook_config: non_empty("PLAYBOOK_CONFIG").map(PathBuf::from),
        }
    }

    /// Playbook table from `playbook_config`, or the built-in defaults.
    pub fn playbooks(&self) -> Result<PlaybookSettings> {
        match &self.playbook_config {
            Some(path) => PlaybookSettings::from_file(path),
            None => Ok(PlaybookSettings::default()),
        }
    }

    pub fn metadata(&self) -> SignalMetadata {
        SignalMetadata {
            instrument: self.instrument.clone(),
            timeframe: self.timeframe,
            symbol: self.symbol.clone(),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable value, using default");
            default
        }),
        _ => default,
    }
}
