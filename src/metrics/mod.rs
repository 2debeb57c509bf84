//! Burstiness and memory of the set-bit process
//!
//! Treats every 1-bit as an event and characterises the inter-event gaps
//! following Goh & Barabási (2008):
//!
//! - Burstiness `B = (σ - m₁) / (σ + m₁)`: +1 for strongly clustered
//!   events, 0 for a Poisson process, -1 for perfectly periodic ones.
//! - Memory `M`: lag-1 autocorrelation of consecutive gaps, normalised by
//!   the gap variance.

pub mod profile;

use crate::constants::metrics::MIN_EVENTS;
use serde::{Deserialize, Serialize};

/// A (B, M) pair for one bit sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPair {
    /// Burstiness, roughly in [-1, 1]
    pub burstiness: f64,
    /// Memory coefficient, 0 when undefined
    pub memory: f64,
}

/// Qualitative reading of the burstiness sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// B > 0: events bunch together
    Clustered,
    /// B == 0: indistinguishable from a Poisson process
    Poissonian,
    /// B < 0: events are spread evenly
    Periodic,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clustered => write!(f, "strong clustering of events"),
            Self::Poissonian => write!(f, "Poisson-like spacing of events"),
            Self::Periodic => write!(f, "events spread evenly (periodic)"),
        }
    }
}

impl MetricPair {
    pub fn new(burstiness: f64, memory: f64) -> Self {
        Self { burstiness, memory }
    }

    pub fn verdict(&self) -> Verdict {
        if self.burstiness > 0.0 {
            Verdict::Clustered
        } else if self.burstiness < 0.0 {
            Verdict::Periodic
        } else {
            Verdict::Poissonian
        }
    }
}

/// Moments of a gap sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapStats {
    /// Number of gaps (n)
    pub count: usize,
    /// First moment m₁
    pub mean: f64,
    /// Second moment m₂
    pub mean_square: f64,
    /// m₂ - m₁²
    pub variance: f64,
    /// √variance
    pub sigma: f64,
}

impl GapStats {
    /// Compute moments; `None` for an empty gap sequence
    pub fn from_gaps(gaps: &[usize]) -> Option<Self> {
        if gaps.is_empty() {
            return None;
        }

        let n = gaps.len() as f64;
        let mean = gaps.iter().map(|&g| g as f64).sum::<f64>() / n;
        let mean_square = gaps.iter().map(|&g| (g as f64) * (g as f64)).sum::<f64>() / n;
        let variance = mean_square - mean * mean;

        Some(Self {
            count: gaps.len(),
            mean,
            mean_square,
            variance,
            sigma: variance.sqrt(),
        })
    }
}

/// Indices of all set bits
pub fn event_positions(bits: &[u8]) -> Vec<usize> {
    bits.iter()
        .enumerate()
        .filter_map(|(i, &b)| if b == 1 { Some(i) } else { None })
        .collect()
}

/// Differences between consecutive event positions
pub fn gaps(positions: &[usize]) -> Vec<usize> {
    positions.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Estimate (B, M) for a bit sequence
///
/// Returns `None` when the sequence holds fewer than five set bits. The
/// memory coefficient falls back to exactly 0 when the gaps have no
/// variance or there are fewer than two of them.
pub fn compute(bits: &[u8]) -> Option<MetricPair> {
    let positions = event_positions(bits);
    if positions.len() < MIN_EVENTS {
        return None;
    }

    let gaps = gaps(&positions);
    let stats = GapStats::from_gaps(&gaps)?;

    Some(MetricPair::new(
        burstiness(&stats),
        memory(&gaps, &stats),
    ))
}

fn burstiness(stats: &GapStats) -> f64 {
    (stats.sigma - stats.mean) / (stats.sigma + stats.mean)
}

fn memory(gaps: &[usize], stats: &GapStats) -> f64 {
    let n = stats.count;
    if n < 2 || stats.variance == 0.0 {
        return 0.0;
    }

    let m1 = stats.mean;
    let lagged: f64 = gaps
        .windows(2)
        .map(|w| (w[0] as f64 - m1) * (w[1] as f64 - m1))
        .sum();

    (1.0 / (n - 1) as f64) * (lagged / stats.variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::decode_with;
    use crate::bits::BitEncoding;
    use crate::qrng::pseudo::SeededPseudoBackend;
    use crate::qrng::QrngBackend;
    use approx::assert_relative_eq;

    fn bits_from(text: &str) -> Vec<u8> {
        decode_with(text.as_bytes(), BitEncoding::Ascii)
    }

    #[test]
    fn test_event_positions_and_gaps() {
        let bits = bits_from("0110001");
        let positions = event_positions(&bits);
        assert_eq!(positions, vec![1, 2, 6]);
        assert_eq!(gaps(&positions), vec![1, 4]);
    }

    #[test]
    fn test_gap_stats() {
        let stats = GapStats::from_gaps(&[1, 1, 11, 1, 1]).unwrap();
        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.mean, 3.0);
        assert_relative_eq!(stats.mean_square, 25.0);
        assert_relative_eq!(stats.variance, 16.0);
        assert_relative_eq!(stats.sigma, 4.0);

        assert!(GapStats::from_gaps(&[]).is_none());
    }

    #[test]
    fn test_too_few_events() {
        assert!(compute(&bits_from("1111")).is_none());
        assert!(compute(&bits_from("1000100010001000")).is_none());
        assert!(compute(&[]).is_none());
        assert!(compute(&[0; 64]).is_none());
    }

    #[test]
    fn test_evenly_spaced_events() {
        let bits = bits_from("1000010000100001000010000");
        let pair = compute(&bits).unwrap();

        assert!(pair.burstiness < 0.0);
        assert_relative_eq!(pair.burstiness, -1.0);
        assert_eq!(pair.memory, 0.0);
        assert_eq!(pair.verdict(), Verdict::Periodic);
    }

    #[test]
    fn test_clustered_events() {
        // gaps 1, 1, 11, 1, 1: m1 = 3, sigma = 4
        let bits = bits_from("1110000000000111");
        let pair = compute(&bits).unwrap();

        assert_relative_eq!(pair.burstiness, 1.0 / 7.0, epsilon = 1e-12);
        // deviations -2, -2, 8, -2, -2 -> lagged sum 4 - 16 - 16 + 4 = -24
        assert_relative_eq!(pair.memory, -24.0 / 4.0 / 16.0, epsilon = 1e-12);
        assert_eq!(pair.verdict(), Verdict::Clustered);
    }

    #[test]
    fn test_regular_is_less_bursty_than_clustered() {
        let regular = compute(&bits_from("10001000100010001000")).unwrap();
        let clustered = compute(&bits_from("1110000000000111")).unwrap();
        assert!(regular.burstiness < clustered.burstiness);
    }

    #[test]
    fn test_alternating_gaps_have_negative_memory() {
        // gaps alternate 1, 3, 1, 3, ...
        let bits = bits_from(&"1100".repeat(20));
        let pair = compute(&bits).unwrap();
        assert!(pair.memory < -0.9, "memory was {}", pair.memory);
    }

    #[test]
    fn test_idempotent() {
        let backend = SeededPseudoBackend::new(42);
        let raw = backend.bytes(512).unwrap();
        let bits = decode_with(&raw, BitEncoding::Packed);

        let first = compute(&bits).unwrap();
        let second = compute(&bits).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pseudo_random_is_near_poisson() {
        // Geometric gaps with p = 1/2 give B = (sqrt(2) - 2) / (sqrt(2) + 2)
        let backend = SeededPseudoBackend::new(42);
        let raw = backend.bytes(4096).unwrap();
        let pair = compute(&decode_with(&raw, BitEncoding::Packed)).unwrap();

        let expected = (2f64.sqrt() - 2.0) / (2f64.sqrt() + 2.0);
        assert!((pair.burstiness - expected).abs() < 0.02, "B = {}", pair.burstiness);
        assert!(pair.memory.abs() < 0.05, "M = {}", pair.memory);
    }

    #[test]
    fn test_verdict_zero() {
        assert_eq!(MetricPair::new(0.0, 0.3).verdict(), Verdict::Poissonian);
    }
}
