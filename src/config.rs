use anyhow::Result;
use std::path::PathBuf;

/// Name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Boolean preferences exposed through the flat `get_settings` projection.
///
/// String- and object-valued preferences (e.g. the geofence polygon) are
/// deliberately absent: the projection only ever reports booleans.
pub const DEFAULT_EXPOSED_KEYS: &[&str] = &[
    "roundAccel",
    "roundBrightness",
    "roundGyro",
    "roundCompass",
    "maxminAccel",
    "maxminBrightness",
    "maxminCompass",
    "maxminGyro",
    "avgAccel",
    "avgBrightness",
    "avgCompass",
    "avgGyro",
    "obfuscateGps",
    "temporalObfuscation",
    "useDelays",
    "usePeerToPeer",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all data
    pub data_dir: PathBuf,
    /// Preference keys exposed by the boolean projection
    pub exposed_keys: Vec<String>,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Use the platform data dir, falling back to the working directory
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dataminer");

        Ok(Self::with_data_dir(base_dir))
    }

    /// Build a config rooted at an explicit directory (used by tests)
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            exposed_keys: DEFAULT_EXPOSED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Full path of the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_file_under_data_dir() {
        let config = Config::with_data_dir(PathBuf::from("/tmp/dm"));
        assert_eq!(
            config.settings_file(),
            PathBuf::from("/tmp/dm/settings.json")
        );
    }

    #[test]
    fn test_default_keys_expose_only_booleans() {
        let config = Config::with_data_dir(PathBuf::from("/tmp/dm"));
        assert_eq!(config.exposed_keys.len(), DEFAULT_EXPOSED_KEYS.len());
        assert!(config.exposed_keys.iter().any(|k| k == "avgAccel"));
        // the geofence is never part of the boolean projection
        assert!(!config.exposed_keys.iter().any(|k| k == "geoFence"));
    }
}
