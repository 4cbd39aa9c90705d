//! Search subject details and last-known-position coordinates.
//!
//! Coordinates are held as signed decimal degrees and written the way
//! planners read them off a chart: whole degrees, decimal minutes and a
//! hemisphere letter (`43 30.500 S`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Descriptive fields carried with a session. The drift arithmetic never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// What the search is for.
    pub name: String,

    /// Free-text description of the last known position.
    pub last_known_position: String,

    /// Decimal degrees, north positive.
    pub latitude: f64,

    /// Decimal degrees, east positive.
    pub longitude: f64,

    pub target_description: String,
}

/// Which coordinate a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }

    /// Hemisphere letters as (positive, negative).
    fn hemispheres(self) -> (char, char) {
        match self {
            Self::Latitude => ('N', 'S'),
            Self::Longitude => ('E', 'W'),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        })
    }
}

/// Why coordinate text could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("cannot read '{0}' as degrees and minutes")]
    Malformed(String),

    #[error("minutes must be in [0, 60), got {0}")]
    Minutes(f64),

    #[error("hemisphere '{found}' does not apply to {axis}")]
    Hemisphere { axis: Axis, found: char },

    #[error("{axis} {value} is outside ±{limit}")]
    OutOfRange { axis: Axis, value: f64, limit: f64 },
}

/// Formats signed decimal degrees as `DD MM.mmm H` (three-digit degrees for longitude).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn format_dm(value: f64, axis: Axis) -> String {
    let (positive, negative) = axis.hemispheres();
    let hemisphere = if value < 0.0 { negative } else { positive };

    // Round once in thousandths of a minute so 59.9999' carries into the degree.
    let thousandths = (value.abs() * 60_000.0).round() as u64;
    let degrees = thousandths / 60_000;
    let minutes = (thousandths % 60_000) as f64 / 1000.0;

    match axis {
        Axis::Latitude => format!("{degrees:02} {minutes:06.3} {hemisphere}"),
        Axis::Longitude => format!("{degrees:03} {minutes:06.3} {hemisphere}"),
    }
}

/// Parses coordinate text into signed decimal degrees.
///
/// Accepts `43 30.5 S`, `43°30.5'S`, `-43 30.5` and `-43.5`.
pub fn parse_dm(text: &str, axis: Axis) -> Result<f64, CoordinateError> {
    let malformed = || CoordinateError::Malformed(text.to_string());

    let cleaned: String = text
        .trim()
        .chars()
        .map(|c| if matches!(c, '°' | '\'' | '′') { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    let (body, hemisphere_sign) = match cleaned.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let letter = c.to_ascii_uppercase();
            let (positive, negative) = axis.hemispheres();
            let sign = if letter == positive {
                1.0
            } else if letter == negative {
                -1.0
            } else {
                return Err(CoordinateError::Hemisphere { axis, found: c });
            };
            (cleaned[..cleaned.len() - c.len_utf8()].trim_end(), Some(sign))
        }
        _ => (cleaned, None),
    };

    let (negated, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, body),
    };
    if negated && hemisphere_sign.is_some() {
        return Err(malformed());
    }

    let parts: Vec<&str> = body.split_whitespace().collect();
    let magnitude = match parts.as_slice() {
        [degrees] => parse_finite(degrees).ok_or_else(malformed)?,
        [degrees, minutes] => {
            let degrees = parse_finite(degrees).ok_or_else(malformed)?;
            let minutes = parse_finite(minutes).ok_or_else(malformed)?;
            if degrees.fract().abs() > 0.0 {
                return Err(malformed());
            }
            if !(0.0..60.0).contains(&minutes) {
                return Err(CoordinateError::Minutes(minutes));
            }
            degrees + minutes / 60.0
        }
        _ => return Err(malformed()),
    };
    if magnitude < 0.0 {
        return Err(malformed());
    }

    let sign = hemisphere_sign.unwrap_or(if negated { -1.0 } else { 1.0 });
    let value = sign * magnitude;

    let limit = axis.limit();
    if value.abs() > limit {
        return Err(CoordinateError::OutOfRange { axis, value, limit });
    }
    Ok(value)
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
