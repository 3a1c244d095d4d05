use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const DEFAULT_LOCATION_ENV: &str = "WEATHER_DEFAULT_LOCATION";

pub const DEFAULT_LOCATION: &str = "Kolkata";
pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Geocoding provider settings (OpenWeather).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEOCODING_URL.to_string(),
        }
    }
}

/// Forecast provider settings (Open-Meteo, no key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_url: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_location = "Kolkata"
/// request_timeout_secs = 10
///
/// [geocoding]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_location: String,
    pub request_timeout_secs: u64,
    pub geocoding: GeocodingConfig,
    pub forecast: ForecastConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            geocoding: GeocodingConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.geocoding.api_key = Some(key);
        }
        if let Some(location) = get(DEFAULT_LOCATION_ENV) {
            self.default_location = location;
        }
    }

    /// API key for the geocoding provider. Missing keys fail here rather than
    /// producing a malformed request later.
    pub fn api_key(&self) -> Result<&str> {
        self.geocoding
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No geocoding API key configured.\n\
                     Hint: run `weather-dash configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.geocoding.api_key = Some(api_key);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
