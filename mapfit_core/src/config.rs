//! Configuration file support for Mapfit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mapfit/config.toml`.

use crate::{Coordinates, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub form: FormConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Map view configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default = "default_tile_attribution")]
    pub tile_attribution: String,

    /// Fallback position when no geolocation source is available.
    #[serde(default)]
    pub home_position: Option<HomePosition>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            tile_attribution: default_tile_attribution(),
            home_position: None,
        }
    }
}

/// A configured lat/lng pair
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HomePosition {
    pub lat: f64,
    pub lng: f64,
}

impl From<HomePosition> for Coordinates {
    fn from(p: HomePosition) -> Self {
        Coordinates::new(p.lat, p.lng)
    }
}

/// Form behavior configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormConfig {
    /// Whether an explicit cancel wipes the typed field values. Off by
    /// default, matching the long-standing behavior.
    #[serde(default)]
    pub clear_inputs_on_cancel: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            clear_inputs_on_cancel: false,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("mapfit")
}

fn default_zoom() -> u8 {
    crate::map::DEFAULT_ZOOM
}

fn default_tile_attribution() -> String {
    "© OpenStreetMap contributors".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("mapfit").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
