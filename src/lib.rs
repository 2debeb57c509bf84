//! burst-cloud: burstiness/memory analysis of QRNG bit samples
//!
//! Reads bit sequences produced by quantum random number generators, treats
//! every '1' as an event and characterises the gaps between events with the
//! Goh–Barabási burstiness (B) and memory (M) coefficients. A directory of
//! samples becomes a cloud of (B, M) points rendered over a density estimate.
//!
//! ## Features
//!
//! - ASCII and packed-binary sample files, detected automatically
//! - B and M per sample, plus a detailed gap profile
//! - KDE cloud plot with centroid and reference markers
//! - Sample acquisition from the ANU QRNG (or a pseudo generator)
//!
//! ## Quick Start
//!
//! ```rust
//! use burst_cloud::bits::decode_bits;
//! use burst_cloud::metrics;
//!
//! let bits = decode_bits(b"10001000100010001000");
//! let pair = metrics::compute(&bits).unwrap();
//! assert_eq!(pair.burstiness, -1.0);
//! assert_eq!(pair.memory, 0.0);
//! ```

pub mod bits;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod metrics;
pub mod pipeline;
pub mod qrng;

// Re-export commonly used types
pub use cloud::{Centroid, FileMetrics, ResultPopulation};
pub use config::Config;
pub use error::{Error, Result};
pub use metrics::{MetricPair, Verdict};
