//! Drift arithmetic: resolving legs into displacements and summing them.
//!
//! Bearings follow the navigation convention: 0° is north, angles run
//! clockwise. Displacements are cartesian with east as +x and north as +y,
//! in nautical miles.

use serde::Serialize;

use crate::model::{LeewayProfile, Leg, LegKind};

/// A leg reduced to the quantities that contribute to total drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Interval length in hours. Negative for an inverted interval.
    pub hours: f64,

    /// Direction of travel in degrees, `[0, 360)`.
    pub direction: f64,

    /// Speed of travel in knots, after any leeway correction.
    pub speed: f64,

    /// `hours * speed`, in nautical miles.
    pub distance: f64,

    pub east: f64,
    pub north: f64,
}

/// Resolves one leg against the active leeway profile.
///
/// Current legs move the way they point at their own speed. Wind legs push
/// downwind, so the direction is reversed, and the speed is the profile's
/// leeway for that wind. The profile is ignored for current legs.
pub fn resolve(leg: &Leg, leeway: &LeewayProfile) -> Resolution {
    let (direction, speed) = match leg.kind {
        LegKind::Current => (normalize_degrees(leg.direction), leg.speed),
        LegKind::Wind => (
            normalize_degrees(leg.direction + 180.0),
            leeway.leeway_speed(leg.speed),
        ),
    };

    let hours = leg.hours();
    let distance = hours * speed;
    let radians = direction.to_radians();

    Resolution {
        hours,
        direction,
        speed,
        distance,
        east: distance * radians.sin(),
        north: distance * radians.cos(),
    }
}

/// The resultant of every leg: how far and which way the object has drifted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftTotal {
    /// Nautical miles.
    pub distance: f64,

    /// Degrees true, `[0, 360)`.
    pub bearing: f64,
}

impl DriftTotal {
    /// Builds the polar form of a summed displacement.
    pub fn from_components(east: f64, north: f64) -> Self {
        let bearing = (east.atan2(north).to_degrees() + 360.0) % 360.0;
        Self {
            distance: east.hypot(north),
            // `+ 0.0` folds a negative zero into zero.
            bearing: bearing + 0.0,
        }
    }
}

/// Sums the displacements of all legs, current and wind alike.
///
/// Every call recomputes from scratch; nothing is cached between calls.
pub fn accumulate<'a, I>(legs: I, leeway: &LeewayProfile) -> DriftTotal
where
    I: IntoIterator<Item = &'a Leg>,
{
    let (east, north) = legs
        .into_iter()
        .map(|leg| resolve(leg, leeway))
        .fold((0.0, 0.0), |(east, north), r| (east + r.east, north + r.north));

    DriftTotal::from_components(east, north)
}

/// Reduces an angle to `[0, 360)`.
fn normalize_degrees(degrees: f64) -> f64 {
    let reduced = degrees % 360.0;
    let reduced = if reduced < 0.0 { reduced + 360.0 } else { reduced };
    // A tiny negative remainder can round up to exactly 360.
    if reduced >= 360.0 { 0.0 } else { reduced + 0.0 }
}
