use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

impl Trend {
    pub fn bias(self) -> Option<Bias> {
        match self {
            Trend::Bullish => Some(Bias::Bullish),
            Trend::Bearish => Some(Bias::Bearish),
            Trend::Neutral => None,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Trend::Neutral
    }
}

/// A committed directional call: what a playbook signal or a structure
/// break points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Bullish => write!(f, "bullish"),
            Bias::Bearish => write!(f, "bearish"),
        }
    }
}

impl Bias {
    pub fn to_direction(self) -> Direction {
        match self {
            Bias::Bullish => Direction::Long,
            Bias::Bearish => Direction::Short,
        }
    }

    pub fn to_trend(self) -> Trend {
        match self {
            Bias::Bullish => Trend::Bullish,
            Bias::Bearish => Trend::Bearish,
        }
    }

    pub fn opposite(self) -> Bias {
        match self {
            Bias::Bullish => Bias::Bearish,
            Bias::Bearish => Bias::Bullish,
        }
    }
}

/// Direction of a normalized signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
    Neutral,
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalDirection::Long => write!(f, "long"),
            SignalDirection::Short => write!(f, "short"),
            SignalDirection::Neutral => write!(f, "neutral"),
        }
    }
}

impl From<Bias> for SignalDirection {
    fn from(bias: Bias) -> Self {
        match bias {
            Bias::Bullish => SignalDirection::Long,
            Bias::Bearish => SignalDirection::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingType {
    High,
    Low,
}

impl fmt::Display for SwingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwingType::High => write!(f, "high"),
            SwingType::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Premium,
    Discount,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Premium => write!(f, "premium"),
            Zone::Discount => write!(f, "discount"),
        }
    }
}

impl Zone {
    /// The zone a position in this direction wants to buy or sell from.
    pub fn entry_zone_for(bias: Bias) -> Zone {
        match bias {
            Bias::Bullish => Zone::Discount,
            Bias::Bearish => Zone::Premium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Asian,
    London,
    Ny,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Asian => write!(f, "asian"),
            Session::London => write!(f, "london"),
            Session::Ny => write!(f, "ny"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    High,
    Low,
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volatility::High => write!(f, "high"),
            Volatility::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
        }
    }
}

impl Grade {
    pub fn from_confidence(confidence: f64) -> Grade {
        if confidence >= 75.0 {
            Grade::A
        } else if confidence >= 50.0 {
            Grade::B
        } else {
            Grade::C
        }
    }
}
