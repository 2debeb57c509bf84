//! Phase-space cloud of (B, M) pairs
//!
//! Collects the metrics of many samples, jitters them for display and
//! renders the density cloud.

pub mod kde;
pub mod plot;

use crate::error::{Error, Result};
use crate::metrics::MetricPair;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Metrics of one analysed sample file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub path: String,
    pub bits: usize,
    pub events: usize,
    #[serde(flatten)]
    pub metrics: MetricPair,
}

/// Mean (B, M) over the population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub burstiness: f64,
    pub memory: f64,
}

/// All (B, M) pairs of one run, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPopulation {
    entries: Vec<FileMetrics>,
}

impl ResultPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FileMetrics) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FileMetrics] {
        &self.entries
    }

    /// Burstiness values in file order
    pub fn burstiness(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.metrics.burstiness).collect()
    }

    /// Memory values in file order
    pub fn memory(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.metrics.memory).collect()
    }

    /// Arithmetic mean of the unjittered values; `None` when empty
    pub fn centroid(&self) -> Option<Centroid> {
        if self.entries.is_empty() {
            return None;
        }

        let n = self.entries.len() as f64;
        Some(Centroid {
            burstiness: self.entries.iter().map(|e| e.metrics.burstiness).sum::<f64>() / n,
            memory: self.entries.iter().map(|e| e.metrics.memory).sum::<f64>() / n,
        })
    }

    /// Display copy of the points with independent Gaussian noise on both axes
    ///
    /// `std_dev` must be finite and non-negative.
    pub fn jittered(&self, std_dev: f64, seed: Option<u64>) -> Result<Vec<(f64, f64)>> {
        if !(std_dev >= 0.0 && std_dev.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "Jitter std must be a non-negative number, got {}",
                std_dev
            )));
        }
        let noise = Normal::new(0.0, std_dev)
            .map_err(|e| Error::InvalidInput(format!("Invalid jitter std {}: {}", std_dev, e)))?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // B noise for every point first, then M
        let b: Vec<f64> = self
            .entries
            .iter()
            .map(|e| e.metrics.burstiness + noise.sample(&mut rng))
            .collect();
        let m: Vec<f64> = self
            .entries
            .iter()
            .map(|e| e.metrics.memory + noise.sample(&mut rng))
            .collect();

        Ok(b.into_iter().zip(m).collect())
    }
}

/// JSON export of a cloud run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudReport {
    pub generated_at: DateTime<Utc>,
    pub files_analyzed: usize,
    pub centroid: Option<Centroid>,
    pub samples: Vec<FileMetrics>,
}

impl CloudReport {
    pub fn new(files_analyzed: usize, population: &ResultPopulation) -> Self {
        Self {
            generated_at: Utc::now(),
            files_analyzed,
            centroid: population.centroid(),
            samples: population.entries().to_vec(),
        }
    }
}
