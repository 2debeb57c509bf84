//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Glob selecting sample files in the working directory
pub const DEFAULT_PATTERN: &str = "qrng_*";

/// File name suffixes never treated as samples
pub const DEFAULT_EXCLUDE: &[&str] = &[".py"];

/// Directory scanned for samples
pub const DEFAULT_DIR: &str = ".";

/// Output image, overwritten on every run
pub const DEFAULT_OUTPUT: &str = "qrng_cloud_analysis_fixed.png";

/// Image width in pixels (12 in at 300 dpi)
pub const DEFAULT_WIDTH: u32 = 3600;

/// Image height in pixels (9 in at 300 dpi)
pub const DEFAULT_HEIGHT: u32 = 2700;

/// Standard deviation of the display jitter
pub const DEFAULT_JITTER_STD: f64 = 0.008;

/// Multiplier on the Scott's rule KDE bandwidth
pub const DEFAULT_BW_ADJUST: f64 = 1.5;

/// Number of filled density contour levels
pub const DEFAULT_KDE_LEVELS: usize = 10;

/// Share of the lowest-density probability mass left unfilled
pub const DEFAULT_KDE_THRESH: f64 = 0.05;

/// KDE evaluation grid points per axis
pub const DEFAULT_KDE_GRID: usize = 200;

/// Default QRNG backend for `fetch`
pub const DEFAULT_BACKEND: &str = "anu";

/// Bytes per fetched sample file
pub const DEFAULT_FETCH_BYTES: usize = 4096;

/// Number of sample files written by `fetch`
pub const DEFAULT_FETCH_COUNT: usize = 1;

/// File name prefix for fetched samples
pub const DEFAULT_FETCH_PREFIX: &str = "qrng_";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "burst-cloud";
