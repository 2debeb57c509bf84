//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::metrics::profile::ProfileReport;

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &ProfileReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Sample: {}\n",
            report.source.as_deref().unwrap_or("<memory>")
        ));
        output.push_str(&format!("Bits read:      {}\n", report.bits));
        output.push_str(&format!("Events ('1'):   {}\n", report.events));
        output.push_str(&format!("Gaps:           {}\n", report.gap_count));
        output.push_str(&format!("p_e:            {:.6}\n\n", report.iid_du.p_e));

        output.push_str(&format!(
            "IID-DU: p_e={:.6}, v(0)={:.6}, |diff|={:.6}\n",
            report.iid_du.p_e, report.iid_du.v0, report.iid_du.diff
        ));
        output.push_str(&format!(
            "Bursts (a={}): {}",
            report.burst_threshold,
            report.bursts.len()
        ));
        if let Some(largest) = report.largest_burst() {
            output.push_str(&format!(
                ", largest weight {} over {} bits",
                largest.weight, largest.length
            ));
        }
        output.push_str("\n\n");

        match (&report.metrics, &report.verdict) {
            (Some(metrics), Some(verdict)) => {
                output.push_str(&format!("Burstiness (B): {:.4}\n", metrics.burstiness));
                output.push_str(&format!("Memory (M):     {:.4}\n", metrics.memory));
                output.push_str(&format!("Verdict: {}\n", verdict));
            }
            _ => output.push_str("Too few events for a burstiness/memory estimate\n"),
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{decode_with, BitEncoding};

    #[test]
    fn test_text_format() {
        let bits = decode_with(b"1000010000100001000010000", BitEncoding::Ascii);
        let report = ProfileReport::build(&bits, 3).with_source("qrng_0002");

        let output = TextFormatter.format(&report).unwrap();

        assert!(output.contains("Sample: qrng_0002"));
        assert!(output.contains("Events ('1'):   5"));
        assert!(output.contains("IID-DU:"));
        assert!(output.contains("Burstiness (B): -1.0000"));
        assert!(output.contains("Memory (M):     0.0000"));
        assert!(output.contains("periodic"));
    }

    #[test]
    fn test_text_format_without_metrics() {
        let report = ProfileReport::build(&[1, 0, 0, 1], 3);
        let output = TextFormatter.format(&report).unwrap();

        assert!(output.contains("<memory>"));
        assert!(output.contains("Too few events"));
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
