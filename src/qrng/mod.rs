//! QRNG (Quantum Random Number Generator) sample sources
//!
//! The `fetch` command pulls raw bytes from one of these backends and stores
//! them as bit files for later analysis. The pseudo backends double as
//! reproducible fixtures in tests.

pub mod anu;
pub mod pseudo;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A source of random bytes
pub trait QrngBackend {
    /// Returns the backend name (e.g., "pseudo", "anu")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this backend
    fn description(&self) -> &'static str;

    /// Produce `n` random bytes
    fn bytes(&self, n: usize) -> Result<Vec<u8>>;
}

/// Information about a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name (used in config/CLI)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Resolve a backend by name
///
/// `seed` only applies to the pseudo backend; `api_key` only to ANU.
pub fn get_backend(
    name: &str,
    seed: Option<u64>,
    api_key: Option<&str>,
) -> Result<Box<dyn QrngBackend>> {
    match name.to_lowercase().as_str() {
        "pseudo" => Ok(match seed {
            Some(seed) => Box::new(pseudo::SeededPseudoBackend::new(seed)),
            None => Box::new(pseudo::PseudoBackend::new()),
        }),
        "anu" => Ok(match api_key {
            Some(key) => Box::new(anu::AnuBackend::with_api_key(key)),
            None => Box::new(anu::AnuBackend::new()),
        }),
        _ => Err(Error::Config(format!("Unknown QRNG backend: {}", name))),
    }
}

/// List all available backends with their info
pub fn available_backends() -> Vec<BackendInfo> {
    vec![
        BackendInfo {
            name: "pseudo".to_string(),
            description: "Pseudo-random number generator (for testing)".to_string(),
        },
        BackendInfo {
            name: "anu".to_string(),
            description: "Australian National University Quantum Random Number Generator"
                .to_string(),
        },
    ]
}
