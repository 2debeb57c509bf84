//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::metrics::profile::ProfileReport;

/// JSON formatter - outputs the full report as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, report: &ProfileReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{decode_with, BitEncoding};

    #[test]
    fn test_json_format() {
        let bits = decode_with(b"1110000000000111", BitEncoding::Ascii);
        let report = ProfileReport::build(&bits, 3).with_source("qrng_0001");

        let output = JsonFormatter.format(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["source"], "qrng_0001");
        assert_eq!(parsed["events"], 6);
        assert_eq!(parsed["verdict"], "clustered");
        assert!(parsed["metrics"]["burstiness"].is_number());
        assert!(parsed["iid_du"]["p_e"].is_number());
        assert!(parsed["gap_density"]["10"].is_number());
    }

    #[test]
    fn test_json_omits_missing_metrics() {
        let report = ProfileReport::build(&[1, 0, 1], 3);
        let output = JsonFormatter.format(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(parsed.get("metrics").is_none());
        assert!(parsed.get("source").is_none());
    }
}
