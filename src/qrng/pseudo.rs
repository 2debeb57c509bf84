//! Pseudo-random backends
//!
//! Not quantum random. Useful for dry runs of `fetch` and, when seeded, for
//! deterministic test samples.

use crate::error::{Error, Result};
use crate::qrng::QrngBackend;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Mutex;

/// Thread-local RNG backend
#[derive(Debug, Default)]
pub struct PseudoBackend;

impl PseudoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl QrngBackend for PseudoBackend {
    fn name(&self) -> &'static str {
        "pseudo"
    }

    fn description(&self) -> &'static str {
        "Pseudo-random number generator (for testing)"
    }

    fn bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; n];
        rand::thread_rng().fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

/// Seeded backend; the same seed yields the same byte stream
pub struct SeededPseudoBackend {
    rng: Mutex<StdRng>,
}

impl SeededPseudoBackend {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl QrngBackend for SeededPseudoBackend {
    fn name(&self) -> &'static str {
        "pseudo-seeded"
    }

    fn description(&self) -> &'static str {
        "Seeded pseudo-random number generator (for reproducible testing)"
    }

    fn bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; n];
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Qrng("Seeded RNG lock poisoned".to_string()))?;
        rng.fill_bytes(&mut bytes);
        Ok(bytes)
    }
}
