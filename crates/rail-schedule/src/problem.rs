//! Planning inputs for the schedule optimizer.
//!
//! These are built fresh for every optimization call from the same snapshot
//! the rest of the analysis cycle uses — the optimizer never invents trains
//! that are not in the snapshot.

use rail_core::{Timestamp, TrainPriority};

/// One train as the optimizer plans it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Train {
    pub train_id: String,
    /// Public-facing train number (timetable identity).
    pub number: String,
    pub train_type: String,
    pub priority: TrainPriority,
    /// Kilometre marker of the current position.
    pub current_km: f32,
    pub destination_km: f32,
    pub scheduled_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
    pub current_speed_kmh: f32,
    pub max_speed_kmh: f32,
}

impl Train {
    /// Minutes behind schedule; zero when on time, early, or unreported.
    pub fn delay_minutes(&self) -> f32 {
        match self.actual_arrival {
            Some(actual) => actual.minutes_since(self.scheduled_arrival).max(0.0),
            None => 0.0,
        }
    }
}

/// One line section the optimizer schedules over.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub section_id: String,
    pub start_km: f32,
    pub end_km: f32,
    pub speed_kmh: f32,
    /// Maximum simultaneous trains.
    pub capacity: u32,
    /// Train ids currently inside, per the snapshot.
    pub occupants: Vec<String>,
}

impl Section {
    /// `true` if the kilometre marker lies within this section (inclusive).
    #[inline]
    pub fn contains(&self, km: f32) -> bool {
        self.start_km <= km && km <= self.end_km
    }

    /// Occupants per capacity slot; may exceed 1.0 when overloaded.
    pub fn occupancy_ratio(&self) -> f32 {
        self.occupants.len() as f32 / self.capacity.max(1) as f32
    }
}

/// What the solver minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Minimize the sum of all hold delays.
    MinimizeDelay,
    /// Minimize the maximum delay across trains (spread departures least).
    MaximizeThroughput,
}

impl Objective {
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::MinimizeDelay => "minimize_total_delay",
            Objective::MaximizeThroughput => "maximize_throughput",
        }
    }
}
