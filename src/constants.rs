//! Centralized constants for the burst-cloud crate
//!
//! Values shared by the loader, the estimator and the renderer live here so
//! that tests and the CLI agree on them.

/// Bit loader heuristics
pub mod bits {
    /// Number of leading bytes inspected when guessing the encoding
    pub const ASCII_PROBE_LEN: usize = 100;

    /// Bit-character count (out of a full probe) that must be exceeded for ASCII
    pub const ASCII_THRESHOLD: usize = 80;

    /// ASCII code of '0'
    pub const ASCII_ZERO: u8 = b'0';

    /// ASCII code of '1'
    pub const ASCII_ONE: u8 = b'1';
}

/// Burstiness/memory estimator
pub mod metrics {
    /// Minimum number of set bits before gap statistics are estimated
    pub const MIN_EVENTS: usize = 5;

    /// Default zero-run threshold separating two bursts
    pub const DEFAULT_BURST_THRESHOLD: usize = 3;
}

/// External API endpoints
pub mod api {
    /// ANU QRNG free tier
    pub const ANU_FREE_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php";

    /// ANU QRNG paid tier (requires API key)
    pub const ANU_PAID_URL: &str = "https://api.quantumnumbers.anu.edu.au";

    /// Maximum number of uint8 values per ANU request
    pub const ANU_MAX_BLOCK_SIZE: usize = 1024;

    /// HTTP timeout for QRNG requests in seconds
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}
