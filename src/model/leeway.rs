//! Leeway profiles: how a search object moves relative to the wind.

use serde::{Deserialize, Serialize};

/// How far downwind a search object drifts for a given wind speed.
///
/// Leeway speed in knots is `wind * multiplier + modifier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LeewayProfile {
    /// Human-readable label, e.g. "Person in water".
    pub description: String,

    /// Fraction of the wind speed carried into leeway.
    pub multiplier: f64,

    /// Fixed offset in knots added after scaling.
    pub modifier: f64,

    /// Angle in degrees either side of downwind the object may diverge.
    /// Shown to the planner; not part of the drift arithmetic.
    pub divergence: f64,
}

impl LeewayProfile {
    /// Leeway speed in knots for the given wind speed.
    pub fn leeway_speed(&self, wind_speed: f64) -> f64 {
        wind_speed * self.multiplier + self.modifier
    }
}
