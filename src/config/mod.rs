//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/burst-cloud/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sample discovery
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Rendering of the phase-space cloud
    #[serde(default)]
    pub plot: PlotConfig,

    /// Sample acquisition
    #[serde(default)]
    pub fetch: FetchConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Sample discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directory scanned for samples
    #[serde(default = "default_dir")]
    pub dir: String,

    /// File name pattern (only `*` and `?` wildcards)
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Suffixes of file names to skip
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

/// Plot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Output image path
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Standard deviation of the display jitter
    #[serde(default = "default_jitter_std")]
    pub jitter_std: f64,

    /// KDE bandwidth multiplier
    #[serde(default = "default_bw_adjust")]
    pub bw_adjust: f64,

    /// Number of density contour levels
    #[serde(default = "default_kde_levels")]
    pub kde_levels: usize,

    /// Lowest-density mass share left unfilled
    #[serde(default = "default_kde_thresh")]
    pub kde_thresh: f64,

    /// KDE grid points per axis
    #[serde(default = "default_kde_grid")]
    pub kde_grid: usize,

    /// Jitter seed; random on every run when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// QRNG backend name
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Bytes per sample file
    #[serde(default = "default_fetch_bytes")]
    pub bytes: usize,

    /// Number of sample files
    #[serde(default = "default_fetch_count")]
    pub count: usize,

    /// File name prefix
    #[serde(default = "default_fetch_prefix")]
    pub prefix: String,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// ANU QRNG API key
    #[serde(default)]
    pub anu: String,
}

// Default value functions for serde
fn default_dir() -> String {
    DEFAULT_DIR.to_string()
}
fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}
fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()
}
fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_jitter_std() -> f64 {
    DEFAULT_JITTER_STD
}
fn default_bw_adjust() -> f64 {
    DEFAULT_BW_ADJUST
}
fn default_kde_levels() -> usize {
    DEFAULT_KDE_LEVELS
}
fn default_kde_thresh() -> f64 {
    DEFAULT_KDE_THRESH
}
fn default_kde_grid() -> usize {
    DEFAULT_KDE_GRID
}
fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}
fn default_fetch_bytes() -> usize {
    DEFAULT_FETCH_BYTES
}
fn default_fetch_count() -> usize {
    DEFAULT_FETCH_COUNT
}
fn default_fetch_prefix() -> String {
    DEFAULT_FETCH_PREFIX.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pattern: default_pattern(),
            exclude: default_exclude(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            width: default_width(),
            height: default_height(),
            jitter_std: default_jitter_std(),
            bw_adjust: default_bw_adjust(),
            kde_levels: default_kde_levels(),
            kde_thresh: default_kde_thresh(),
            kde_grid: default_kde_grid(),
            seed: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            bytes: default_fetch_bytes(),
            count: default_fetch_count(),
            prefix: default_fetch_prefix(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["analysis", "dir"] => Some(self.analysis.dir.clone()),
            ["analysis", "pattern"] => Some(self.analysis.pattern.clone()),
            ["analysis", "exclude"] => Some(self.analysis.exclude.join(",")),

            ["plot", "output"] => Some(self.plot.output.clone()),
            ["plot", "width"] => Some(self.plot.width.to_string()),
            ["plot", "height"] => Some(self.plot.height.to_string()),
            ["plot", "jitter_std"] => Some(self.plot.jitter_std.to_string()),
            ["plot", "bw_adjust"] => Some(self.plot.bw_adjust.to_string()),
            ["plot", "kde_levels"] => Some(self.plot.kde_levels.to_string()),
            ["plot", "kde_thresh"] => Some(self.plot.kde_thresh.to_string()),
            ["plot", "kde_grid"] => Some(self.plot.kde_grid.to_string()),
            ["plot", "seed"] => Some(
                self.plot
                    .seed
                    .map_or_else(|| "none".to_string(), |s| s.to_string()),
            ),

            ["fetch", "backend"] => Some(self.fetch.backend.clone()),
            ["fetch", "bytes"] => Some(self.fetch.bytes.to_string()),
            ["fetch", "count"] => Some(self.fetch.count.to_string()),
            ["fetch", "prefix"] => Some(self.fetch.prefix.clone()),

            ["api_keys", "anu"] => Some(self.api_keys.anu.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key". List values are comma separated and
    /// `plot.seed` accepts "none" to clear the seed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["analysis", "dir"] => self.analysis.dir = value.to_string(),
            ["analysis", "pattern"] => self.analysis.pattern = value.to_string(),
            ["analysis", "exclude"] => {
                self.analysis.exclude = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }

            ["plot", "output"] => self.plot.output = value.to_string(),
            ["plot", "width"] => self.plot.width = parse_value(key, value)?,
            ["plot", "height"] => self.plot.height = parse_value(key, value)?,
            ["plot", "jitter_std"] => {
                let std_dev: f64 = parse_value(key, value)?;
                if !(std_dev >= 0.0 && std_dev.is_finite()) {
                    return Err(Error::Config(format!(
                        "{} must be a non-negative number, got {}",
                        key, value
                    )));
                }
                self.plot.jitter_std = std_dev;
            }
            ["plot", "bw_adjust"] => self.plot.bw_adjust = parse_value(key, value)?,
            ["plot", "kde_levels"] => self.plot.kde_levels = parse_value(key, value)?,
            ["plot", "kde_thresh"] => self.plot.kde_thresh = parse_value(key, value)?,
            ["plot", "kde_grid"] => self.plot.kde_grid = parse_value(key, value)?,
            ["plot", "seed"] => {
                self.plot.seed = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_value(key, value)?)
                };
            }

            ["fetch", "backend"] => self.fetch.backend = value.to_string(),
            ["fetch", "bytes"] => self.fetch.bytes = parse_value(key, value)?,
            ["fetch", "count"] => self.fetch.count = parse_value(key, value)?,
            ["fetch", "prefix"] => self.fetch.prefix = value.to_string(),

            ["api_keys", "anu"] => self.api_keys.anu = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "analysis.dir",
            "analysis.pattern",
            "analysis.exclude",
            "plot.output",
            "plot.width",
            "plot.height",
            "plot.jitter_std",
            "plot.bw_adjust",
            "plot.kde_levels",
            "plot.kde_thresh",
            "plot.kde_grid",
            "plot.seed",
            "fetch.backend",
            "fetch.bytes",
            "fetch.count",
            "fetch.prefix",
            "api_keys.anu",
        ]
    }

    /// ANU API key, if one is configured
    pub fn anu_key(&self) -> Option<&str> {
        Some(self.api_keys.anu.as_str()).filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.analysis.pattern, "qrng_*");
        assert_eq!(config.analysis.exclude, vec![".py".to_string()]);
        assert_eq!(config.plot.output, "qrng_cloud_analysis_fixed.png");
        assert_eq!(config.plot.jitter_std, 0.008);
        assert_eq!(config.plot.bw_adjust, 1.5);
        assert_eq!(config.plot.seed, None);
        assert_eq!(config.fetch.bytes, 4096);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("analysis.pattern"), Some("qrng_*".to_string()));
        config.set("analysis.pattern", "sample_??.bin").unwrap();
        assert_eq!(config.get("analysis.pattern"), Some("sample_??.bin".to_string()));

        config.set("plot.width", "1200").unwrap();
        assert_eq!(config.plot.width, 1200);

        config.set("analysis.exclude", ".py, .png,").unwrap();
        assert_eq!(config.analysis.exclude, vec![".py", ".png"]);
        assert_eq!(config.get("analysis.exclude"), Some(".py,.png".to_string()));
    }

    #[test]
    fn test_seed_roundtrip() {
        let mut config = Config::default();
        assert_eq!(config.get("plot.seed"), Some("none".to_string()));

        config.set("plot.seed", "42").unwrap();
        assert_eq!(config.plot.seed, Some(42));

        config.set("plot.seed", "None").unwrap();
        assert_eq!(config.plot.seed, None);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("plot.jitter_std", "wide").is_err());
        assert!(config.set("plot.jitter_std", "-0.01").is_err());
        assert!(config.set("plot.jitter_std", "inf").is_err());
        assert_eq!(config.plot.jitter_std, 0.008);
        assert!(config.set("plot.seed", "-1").is_err());
    }

    #[test]
    fn test_every_available_key_resolves() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_anu_key() {
        let mut config = Config::default();
        assert_eq!(config.anu_key(), None);
        config.api_keys.anu = "secret".to_string();
        assert_eq!(config.anu_key(), Some("secret"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.plot.seed = Some(7);
        config.analysis.pattern = "bits_*".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.plot.seed, Some(7));
        assert_eq!(loaded.analysis.pattern, "bits_*");
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.plot.width, DEFAULT_WIDTH);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[plot]\nseed = 3\n").unwrap();
        assert_eq!(loaded.plot.seed, Some(3));
        assert_eq!(loaded.plot.kde_grid, DEFAULT_KDE_GRID);
        assert_eq!(loaded.analysis.pattern, DEFAULT_PATTERN);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[analysis]"));
        assert!(toml.contains("[plot]"));
        assert!(toml.contains("[fetch]"));
        assert!(!toml.contains("seed"));
    }
}
