//! Core data model for drift planning.
//!
//! Legs of current and wind, the leeway profiles that turn wind into
//! drift, and the descriptive details of what is being searched for.

mod leeway;
mod leg;
mod position;

pub use leeway::LeewayProfile;
pub use leg::{Leg, LegKind, ScalarField, TimeEnd};
pub use position::{Axis, CoordinateError, Subject, format_dm, parse_dm};
