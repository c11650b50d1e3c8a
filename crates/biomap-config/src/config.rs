//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Preview rendering settings.
    pub preview: PreviewConfig,
    /// Image export settings.
    pub export: ExportConfig,
    /// World generation settings.
    pub world: WorldConfig,
    /// Biome color profile settings.
    pub profile: ProfileConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Preview rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Side length of the square preview raster in pixels.
    pub size: u32,
    /// Nearest-neighbor enlargement applied when the preview is displayed.
    pub display_scale: u32,
    /// Sample every world unit instead of every fourth one.
    pub full_resolution: bool,
}

/// Image export configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory of the most recent export; new exports are suggested here.
    pub last_export_dir: String,
    /// Upper bound on exported pixels. Larger requests are refused.
    pub max_pixels: u64,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: i64,
    /// World type name (`default` or `large_biomes`).
    pub world_type: String,
}

/// Biome color profile configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Path to a RON biome profile. `None` uses the built-in profile.
    pub path: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for JSON log files in debug builds.
    pub log_dir: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            size: 100,
            display_scale: 2,
            full_resolution: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            last_export_dir: ".".to_string(),
            max_pixels: 1 << 28,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_type: "default".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Platform config directory for biomap, falling back to the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("biomap"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Record the directory of a finished export so the next one starts there.
    ///
    /// Relative paths are resolved against the current directory. Returns
    /// `true` if the stored directory changed.
    pub fn remember_export_dir(&mut self, exported_file: &Path) -> bool {
        let absolute = std::path::absolute(exported_file).unwrap_or_else(|_| exported_file.into());
        let Some(parent) = absolute.parent() else {
            return false;
        };
        let dir = parent.display().to_string();
        if dir == self.export.last_export_dir {
            return false;
        }
        log::debug!("Remembering export directory {dir}");
        self.export.last_export_dir = dir;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("size: 100"));
        assert!(ron_str.contains("world_type: \"default\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.profile.path = Some(PathBuf::from("profiles/classic.ron"));
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `export` section entirely
        let ron_str = "(preview: (size: 64), world: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.export, ExportConfig::default());
        assert_eq!(config.preview.size, 64);
        assert_eq!(config.preview.display_scale, 2);
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = -4_172_144_997_902_289_642;
        config.preview.full_resolution = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.preview.size = 256;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().preview.size, 256);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_remember_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        let file = dir.path().join("biomes_default_0.png");

        assert!(config.remember_export_dir(&file));
        assert_eq!(config.export.last_export_dir, dir.path().display().to_string());
        // Same directory again is not a change.
        assert!(!config.remember_export_dir(&file));
    }
}
