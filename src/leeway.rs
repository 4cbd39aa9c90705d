//! Leeway reference data: the ordered table of profiles a planner picks from.
//!
//! A table ships with the binary. A service with its own coefficients can
//! point `leeway-table` in the config at a TOML file of the same shape:
//!
//! ```toml
//! [[profile]]
//! description = "Person in water"
//! multiplier = 0.011
//! modifier = 0.07
//! divergence = 30.0
//! ```

use std::{fs, io, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::model::LeewayProfile;

const BUNDLED: &str = include_str!("../data/leeway.toml");

/// Errors that can occur loading a leeway table.
#[derive(Debug, thiserror::Error)]
pub enum LeewayError {
    #[error("failed to read leeway table {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid leeway table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("leeway table has no profiles")]
    Empty,

    #[error("leeway profile '{0}' has a non-finite coefficient")]
    NonFinite(String),
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(rename = "profile", default)]
    profiles: Vec<LeewayProfile>,
}

/// An ordered, non-empty list of leeway profiles, addressed by position.
#[derive(Debug, Clone, PartialEq)]
pub struct LeewayTable {
    profiles: Vec<LeewayProfile>,
}

impl LeewayTable {
    /// Builds a table, rejecting an empty list or non-finite coefficients.
    pub fn new(profiles: Vec<LeewayProfile>) -> Result<Self, LeewayError> {
        let table = Self { profiles };
        if table.is_empty() {
            return Err(LeewayError::Empty);
        }
        if let Some(bad) = table.iter().find(|p| {
            !(p.multiplier.is_finite() && p.modifier.is_finite() && p.divergence.is_finite())
        }) {
            return Err(LeewayError::NonFinite(bad.description.clone()));
        }
        Ok(table)
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self, LeewayError> {
        Self::from_toml(BUNDLED)
    }

    /// Parses a table from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, LeewayError> {
        let file: TableFile = toml::from_str(text)?;
        Self::new(file.profiles)
    }

    /// Reads a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, LeewayError> {
        let text = fs::read_to_string(path).map_err(|source| LeewayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml(&text)?;
        log::info!(
            "loaded {} leeway profiles from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Loads the table named by the config, or the bundled one when none is named.
    pub fn resolve(path: Option<&Path>) -> Result<Self, LeewayError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&LeewayProfile> {
        self.profiles.get(index)
    }

    /// The first profile; every table has one.
    pub fn first(&self) -> &LeewayProfile {
        &self.profiles[0]
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeewayProfile> {
        self.profiles.iter()
    }
}
