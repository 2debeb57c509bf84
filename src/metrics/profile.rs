//! Detailed gap profile of a single sample
//!
//! Complements the (B, M) estimate with the descriptive statistics used when
//! eyeballing one QRNG sample:
//! - Bit occurrence probability `p_e`
//! - Zero-run density `v(k)` and survival `u(k) = P(run >= k)`
//! - IID-DU check: for an i.i.d. uniform source `v(0)` matches `p_e`
//! - Burst decomposition at a zero-run threshold

use crate::metrics::{compute, event_positions, MetricPair, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A maximal group of events separated by short zero runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burst {
    /// Number of set bits in the burst
    pub weight: usize,
    /// Span in bits from first to last set bit, inclusive
    pub length: usize,
}

/// Result of comparing `p_e` with `v(0)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IidDuCheck {
    pub p_e: f64,
    pub v0: f64,
    pub diff: f64,
}

/// Number of zeros between consecutive set bits
pub fn zero_runs(bits: &[u8]) -> Vec<usize> {
    event_positions(bits)
        .windows(2)
        .map(|w| w[1] - w[0] - 1)
        .collect()
}

/// Fraction of set bits; 0 for an empty sequence
pub fn bit_occurrence_probability(bits: &[u8]) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    let ones = bits.iter().filter(|&&b| b == 1).count();
    ones as f64 / bits.len() as f64
}

/// Relative frequency `v(k)` of each zero-run length
pub fn gap_density(runs: &[usize]) -> BTreeMap<usize, f64> {
    let mut density = BTreeMap::new();
    if runs.is_empty() {
        return density;
    }

    let total = runs.len() as f64;
    for &k in runs {
        *density.entry(k).or_insert(0.0) += 1.0 / total;
    }
    density
}

/// Survival function `u(k) = P(run >= k)` for `k` in `0..=max`
pub fn gap_survival(runs: &[usize]) -> BTreeMap<usize, f64> {
    let mut survival = BTreeMap::new();
    let Some(&max) = runs.iter().max() else {
        return survival;
    };

    let total = runs.len() as f64;
    for k in 0..=max {
        let count = runs.iter().filter(|&&r| r >= k).count();
        survival.insert(k, count as f64 / total);
    }
    survival
}

/// Compare the bit occurrence probability with the share of adjacent ones
pub fn iid_du_check(bits: &[u8]) -> IidDuCheck {
    let p_e = bit_occurrence_probability(bits);
    let runs = zero_runs(bits);

    let v0 = if runs.is_empty() {
        0.0
    } else {
        runs.iter().filter(|&&k| k == 0).count() as f64 / runs.len() as f64
    };

    IidDuCheck {
        p_e,
        v0,
        diff: (p_e - v0).abs(),
    }
}

/// Split the events into bursts
///
/// Two consecutive events belong to the same burst when fewer than
/// `threshold` zeros separate them.
pub fn bursts(bits: &[u8], threshold: usize) -> Vec<Burst> {
    let positions = event_positions(bits);
    let Some((&first, rest)) = positions.split_first() else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut start = first;
    let mut last = first;
    let mut weight = 1;

    for &p in rest {
        if p - last - 1 < threshold {
            weight += 1;
        } else {
            result.push(Burst {
                weight,
                length: last - start + 1,
            });
            start = p;
            weight = 1;
        }
        last = p;
    }

    result.push(Burst {
        weight,
        length: last - start + 1,
    });
    result
}

/// Everything `inspect` reports about one sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Source file, if the bits came from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub bits: usize,
    pub events: usize,
    pub gap_count: usize,
    pub iid_du: IidDuCheck,
    pub burst_threshold: usize,
    pub bursts: Vec<Burst>,
    pub gap_density: BTreeMap<usize, f64>,
    /// Absent when the sample has too few events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl ProfileReport {
    /// Build the report for a bit sequence
    pub fn build(bits: &[u8], burst_threshold: usize) -> Self {
        let runs = zero_runs(bits);
        let metrics = compute(bits);

        Self {
            source: None,
            generated_at: Utc::now(),
            bits: bits.len(),
            events: bits.iter().filter(|&&b| b == 1).count(),
            gap_count: runs.len(),
            iid_du: iid_du_check(bits),
            burst_threshold,
            bursts: bursts(bits, burst_threshold),
            gap_density: gap_density(&runs),
            verdict: metrics.map(|m| m.verdict()),
            metrics,
        }
    }

    /// Attach the source path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Largest burst by weight
    pub fn largest_burst(&self) -> Option<&Burst> {
        self.bursts.iter().max_by_key(|b| b.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{decode_with, BitEncoding};
    use crate::qrng::pseudo::SeededPseudoBackend;
    use crate::qrng::QrngBackend;
    use approx::assert_relative_eq;

    fn bits_from(text: &str) -> Vec<u8> {
        decode_with(text.as_bytes(), BitEncoding::Ascii)
    }

    #[test]
    fn test_zero_runs() {
        assert_eq!(zero_runs(&bits_from("1101001")), vec![0, 1, 2]);
        assert!(zero_runs(&bits_from("0001")).is_empty());
    }

    #[test]
    fn test_bit_occurrence_probability() {
        assert_relative_eq!(bit_occurrence_probability(&bits_from("1100")), 0.5);
        assert_eq!(bit_occurrence_probability(&[]), 0.0);
    }

    #[test]
    fn test_gap_density_sums_to_one() {
        let runs = vec![0, 0, 1, 3, 3, 3];
        let density = gap_density(&runs);

        assert_relative_eq!(density[&0], 2.0 / 6.0);
        assert_relative_eq!(density[&3], 3.0 / 6.0);
        assert!(!density.contains_key(&2));
        assert_relative_eq!(density.values().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gap_survival() {
        let survival = gap_survival(&[0, 1, 3]);
        assert_relative_eq!(survival[&0], 1.0);
        assert_relative_eq!(survival[&1], 2.0 / 3.0);
        assert_relative_eq!(survival[&2], 1.0 / 3.0);
        assert_relative_eq!(survival[&3], 1.0 / 3.0);
        assert_eq!(survival.len(), 4);

        assert!(gap_survival(&[]).is_empty());
    }

    #[test]
    fn test_iid_du_check_on_random_bits() {
        let backend = SeededPseudoBackend::new(42);
        let raw = backend.bytes(4096).unwrap();
        let check = iid_du_check(&decode_with(&raw, BitEncoding::Packed));

        assert!((check.p_e - 0.5).abs() < 0.02);
        assert!(check.diff < 0.03, "diff = {}", check.diff);
    }

    #[test]
    fn test_iid_du_check_without_gaps() {
        let check = iid_du_check(&bits_from("0100"));
        assert_relative_eq!(check.p_e, 0.25);
        assert_eq!(check.v0, 0.0);
        assert_relative_eq!(check.diff, 0.25);
    }

    #[test]
    fn test_bursts() {
        // runs: 0, 1, 5, 0 -> with threshold 3 the 5-run splits
        let bits = bits_from("11010000011");
        let found = bursts(&bits, 3);

        assert_eq!(
            found,
            vec![
                Burst { weight: 3, length: 4 },
                Burst { weight: 2, length: 2 },
            ]
        );
    }

    #[test]
    fn test_bursts_threshold_zero_isolates_events() {
        let found = bursts(&bits_from("111"), 0);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|b| b.weight == 1 && b.length == 1));
    }

    #[test]
    fn test_bursts_empty() {
        assert!(bursts(&bits_from("0000"), 3).is_empty());
    }

    #[test]
    fn test_report() {
        let bits = bits_from("1110000000000111");
        let report = ProfileReport::build(&bits, 3).with_source("sample.txt");

        assert_eq!(report.source.as_deref(), Some("sample.txt"));
        assert_eq!(report.bits, 16);
        assert_eq!(report.events, 6);
        assert_eq!(report.gap_count, 5);
        assert_eq!(report.bursts.len(), 2);
        assert_eq!(report.largest_burst().map(|b| b.weight), Some(3));
        assert_eq!(report.verdict, Some(Verdict::Clustered));
        assert!(report.metrics.is_some());
    }

    #[test]
    fn test_report_without_metrics() {
        let report = ProfileReport::build(&bits_from("1001"), 3);
        assert!(report.metrics.is_none());
        assert!(report.verdict.is_none());
        assert_eq!(report.gap_count, 1);
    }
}
