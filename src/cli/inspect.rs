//! Inspect command handler
//!
//! Prints the gap profile of one sample file.

use crate::bits::load_bits;
use crate::constants::metrics::DEFAULT_BURST_THRESHOLD;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::metrics::profile::ProfileReport;
use clap::Args;
use std::path::PathBuf;

/// Inspect command arguments
#[derive(Args)]
pub struct InspectArgs {
    /// Sample file (ASCII bits or packed binary)
    #[arg(required_unless_present = "list_formats")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Zero runs shorter than this keep events in the same burst
    #[arg(long, short = 'a', default_value_t = DEFAULT_BURST_THRESHOLD)]
    pub burst_threshold: usize,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the inspect command
pub fn run(args: InspectArgs) -> Result<()> {
    if args.list_formats {
        println!("Available output formats:");
        for format in available_formats() {
            println!("  {:6} - {}", format.name, format.description);
        }
        return Ok(());
    }

    let path = args
        .file
        .ok_or_else(|| Error::InvalidInput("No sample file given".to_string()))?;

    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let bits = load_bits(&path)?;
    let report =
        ProfileReport::build(&bits, args.burst_threshold).with_source(path.display().to_string());
    let output = formatter.format(&report)?;

    if let Some(out) = args.output {
        std::fs::write(&out, &output)?;
        eprintln!("Output written to {}", out.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_writes_report() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("qrng_0001");
        std::fs::write(&sample, "1110000000000111").unwrap();
        let out = dir.path().join("report.json");

        run(InspectArgs {
            file: Some(sample),
            format: "json".to_string(),
            burst_threshold: 3,
            output: Some(out.clone()),
            list_formats: false,
        })
        .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(parsed["bits"], 16);
        assert_eq!(parsed["bursts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_inspect_unknown_format() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("qrng_0001");
        std::fs::write(&sample, "1").unwrap();

        let result = run(InspectArgs {
            file: Some(sample),
            format: "gpx".to_string(),
            burst_threshold: 3,
            output: None,
            list_formats: false,
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
