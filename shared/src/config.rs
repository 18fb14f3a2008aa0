//! Preference persistence
//!
//! Only presentation preferences are saved; zone selections and times are
//! session state and always start from the live clock.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Error type for preference operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    NoConfigDir,
    /// IO error while reading/writing preferences
    Io(io::Error),
    /// Failed to parse the preferences file
    Parse(toml::de::Error),
    /// Failed to serialize preferences
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Presentation preferences for the board window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prefs {
    /// Dark palette for canvas and panels.
    pub dark_mode: bool,
    /// Skip the drag ghost animation.
    pub reduced_motion: bool,
    /// Step applied by the time-field nudge buttons, in minutes.
    pub time_step_minutes: u32,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            dark_mode: false,
            reduced_motion: false,
            time_step_minutes: 5,
        }
    }
}

/// Path of the preferences file.
pub fn prefs_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "zone-board", "board")
        .map(|dirs| dirs.config_dir().join("prefs.toml"))
}

/// Load saved preferences.
///
/// Returns `None` if no preferences file exists yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_prefs() -> Result<Option<Prefs>, ConfigError> {
    let path = prefs_path().ok_or(ConfigError::NoConfigDir)?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let prefs: Prefs = toml::from_str(&contents)?;
    Ok(Some(prefs))
}

/// Save preferences, creating the config directory if needed.
pub fn save_prefs(prefs: &Prefs) -> Result<(), ConfigError> {
    let path = prefs_path().ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(prefs)?;
    fs::write(&path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_path() {
        let path = prefs_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("prefs.toml"));
    }

    #[test]
    fn test_default_step_is_five_minutes() {
        assert_eq!(Prefs::default().time_step_minutes, 5);
    }

    #[test]
    fn test_prefs_round_trip_through_toml() {
        let prefs = Prefs {
            dark_mode: true,
            reduced_motion: false,
            time_step_minutes: 15,
        };
        let text = toml::to_string_pretty(&prefs).unwrap();
        let back: Prefs = toml::from_str(&text).unwrap();
        assert_eq!(back, prefs);
    }
}
