//! Shared domain vocabulary: node kinds, signal aspects, priorities, severities.

use std::fmt;
use std::str::FromStr;

// ── Infrastructure ────────────────────────────────────────────────────────────

/// What a topology node represents on the ground.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Station,
    Signal,
    Junction,
}

/// Maintenance condition of a track segment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackCondition {
    #[default]
    Good,
    Fair,
    Poor,
    Critical,
}

/// Operational role of a lineside signal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalKind {
    Home,
    Starter,
    Distant,
    Shunt,
    Automatic,
}

/// Displayed state of a signal.  Aspect transitions are unconstrained inputs;
/// this core enforces no interlocking logic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aspect {
    /// The safe default until a feed reports otherwise.
    #[default]
    Red,
    Yellow,
    DoubleYellow,
    Green,
}

impl FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RED" => Ok(Aspect::Red),
            "YELLOW" => Ok(Aspect::Yellow),
            "DOUBLE_YELLOW" => Ok(Aspect::DoubleYellow),
            "GREEN" => Ok(Aspect::Green),
            other => Err(format!("unknown signal aspect {other:?}")),
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Aspect::Red => "RED",
            Aspect::Yellow => "YELLOW",
            Aspect::DoubleYellow => "DOUBLE_YELLOW",
            Aspect::Green => "GREEN",
        };
        f.write_str(s)
    }
}

// ── Traffic ───────────────────────────────────────────────────────────────────

/// Train precedence class.  Lower ordinal = higher precedence.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainPriority {
    MailExpress,
    Passenger,
    /// Default for feeds that omit the field.
    #[default]
    Freight,
    Maintenance,
}

impl TrainPriority {
    /// The ordinal the feed and the scheduler speak in (1 = highest precedence).
    #[inline]
    pub fn ordinal(self) -> u8 {
        match self {
            TrainPriority::MailExpress => 1,
            TrainPriority::Passenger => 2,
            TrainPriority::Freight => 3,
            TrainPriority::Maintenance => 4,
        }
    }

    /// Map a feed ordinal back to a priority class.  Out-of-range values
    /// degrade to the default rather than failing the ingestion cycle.
    pub fn from_ordinal(n: u8) -> TrainPriority {
        match n {
            1 => TrainPriority::MailExpress,
            2 => TrainPriority::Passenger,
            3 => TrainPriority::Freight,
            4 => TrainPriority::Maintenance,
            _ => TrainPriority::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrainPriority::MailExpress => "MAIL_EXPRESS",
            TrainPriority::Passenger => "PASSENGER",
            TrainPriority::Freight => "FREIGHT",
            TrainPriority::Maintenance => "MAINTENANCE",
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Conflict severity ranking, used to prioritize conflicts for action
/// generation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric weight (LOW=1 … CRITICAL=4) multiplied with probability when
    /// ranking conflicts.
    #[inline]
    pub fn weight(self) -> f32 {
        match self {
            Severity::Low => 1.0,
            Severity::Medium => 2.0,
            Severity::High => 3.0,
            Severity::Critical => 4.0,
        }
    }
}

/// How soon a recommended action should be taken.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Coarse classification of an action's impact on section capacity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapacityImpact {
    Low,
    Moderate,
    High,
}
