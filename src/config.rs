//! tdv configuration.
//!
//! Loaded from `~/.tdv/config.toml`. A missing file means defaults.
//!
//! ```toml
//! # Leeway table to use instead of the bundled one.
//! # Relative paths are taken from the config file's directory.
//! leeway-table = "leeway.toml"
//!
//! # Profile selected when a session starts, counting from 1.
//! default-leeway = 4
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Errors that can occur reading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// tdv configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// A leeway table file replacing the bundled table.
    pub leeway_table: Option<PathBuf>,

    /// 1-based position of the profile selected at session start.
    pub default_leeway: Option<usize>,
}

impl Config {
    /// Load config from `~/.tdv/config.toml`, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(table) = &config.leeway_table
            && table.is_relative()
            && let Some(dir) = path.parent()
        {
            config.leeway_table = Some(dir.join(table));
        }

        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The config file path: `~/.tdv/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tdv").join("config.toml"))
    }

    /// 0-based index of the profile to select at session start.
    pub fn default_leeway_index(&self) -> Option<usize> {
        self.default_leeway.and_then(|n| n.checked_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_keys_and_anchors_relative_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "leeway-table = \"nz.toml\"\ndefault-leeway = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.leeway_table, Some(dir.path().join("nz.toml")));
        assert_eq!(config.default_leeway_index(), Some(2));
    }

    #[test]
    fn absolute_table_path_is_kept() {
        let dir = TempDir::new().unwrap();
        let table = dir.path().join("elsewhere").join("table.toml");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            format!("leeway-table = {:?}\n", table.to_string_lossy()),
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.leeway_table, Some(table));
    }

    #[test]
    fn zero_default_leeway_selects_nothing() {
        let config = Config {
            leeway_table: None,
            default_leeway: Some(0),
        };
        assert_eq!(config.default_leeway_index(), None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default-leeway = \"first\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "leeway = 2\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
