//! Drift legs: one timed, directional movement contributing to total drift.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One interval of motion, either water movement or wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// 1-based sequence number within its collection. Display only.
    pub index: usize,

    /// Start of the interval.
    pub time_from: Timestamp,

    /// End of the interval. Expected to be `>= time_from`, not enforced.
    pub time_to: Timestamp,

    /// Heading in degrees.
    ///
    /// For a current leg this is the direction the water moves toward.
    /// For a wind leg it is the direction the wind blows from.
    pub direction: f64,

    /// Magnitude in knots.
    pub speed: f64,

    pub kind: LegKind,
}

impl Leg {
    /// A fresh leg with zero direction and speed.
    pub fn new(kind: LegKind, index: usize, time_from: Timestamp, time_to: Timestamp) -> Self {
        Self {
            index,
            time_from,
            time_to,
            direction: 0.0,
            speed: 0.0,
            kind,
        }
    }

    /// Length of the interval in hours.
    ///
    /// Negative when `time_to` precedes `time_from`.
    #[allow(clippy::cast_precision_loss)] // Millisecond spans of a drift plan fit well inside f64.
    pub fn hours(&self) -> f64 {
        let millis = self.time_to.as_millisecond() - self.time_from.as_millisecond();
        millis as f64 / 3_600_000.0
    }

    /// Writes a scalar field. The only mutable scalars are the two in [`ScalarField`].
    pub fn set_scalar(&mut self, field: ScalarField, value: f64) {
        match field {
            ScalarField::Direction => self.direction = value,
            ScalarField::Speed => self.speed = value,
        }
    }

    /// Writes one end of the time interval.
    pub fn set_time(&mut self, end: TimeEnd, at: Timestamp) {
        match end {
            TimeEnd::From => self.time_from = at,
            TimeEnd::To => self.time_to = at,
        }
    }
}

/// Which collection a leg belongs to. Determines how it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegKind {
    /// Water movement. Direction is taken as given, speed unmodified.
    Current,

    /// Wind. Drift runs downwind, speed corrected by the selected leeway profile.
    Wind,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Wind => "wind",
        })
    }
}

/// Scalar leg fields that may be edited after a leg is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Direction,
    Speed,
}

impl FromStr for ScalarField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direction" => Ok(Self::Direction),
            "speed" => Ok(Self::Speed),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direction => "direction",
            Self::Speed => "speed",
        })
    }
}

/// A field name outside the editable set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown leg field '{0}': expected direction or speed")]
pub struct UnknownField(pub String);

/// Which end of a leg's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEnd {
    From,
    To,
}
