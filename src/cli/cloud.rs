//! Cloud command handler
//!
//! Analyses every sample in a directory and renders the (B, M) cloud.

use crate::cloud::plot::render_cloud;
use crate::cloud::{Centroid, CloudReport, ResultPopulation};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{analyze_files, discover_samples, SampleSelector};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Cloud command arguments
#[derive(Args, Default)]
pub struct CloudArgs {
    /// Directory containing the samples
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// File name pattern selecting samples (only `*` and `?` wildcards)
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// File name suffix to skip (repeatable, replaces the configured list)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Output image path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Seed for the display jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Also write the per-file results as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// What a cloud run produced
#[derive(Debug)]
pub struct CloudOutcome {
    pub files: usize,
    pub population: ResultPopulation,
    /// Set when a plot was written
    pub centroid: Option<Centroid>,
    pub output: PathBuf,
}

/// Run the cloud command
pub fn run(args: CloudArgs) -> Result<()> {
    let config = Config::load()?;
    let outcome = execute(&config, args)?;

    if let Some(centroid) = outcome.centroid {
        println!("\nMean B: {:.5}", centroid.burstiness);
        println!("Mean M: {:.5}", centroid.memory);
    }

    Ok(())
}

/// Discover, analyse and render with config values overridden by `args`
pub fn execute(config: &Config, args: CloudArgs) -> Result<CloudOutcome> {
    let mut plot = config.plot.clone();
    if let Some(seed) = args.seed {
        plot.seed = Some(seed);
    }
    if let Some(width) = args.width {
        plot.width = width;
    }
    if let Some(height) = args.height {
        plot.height = height;
    }

    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(&config.analysis.dir));
    let output = args.output.unwrap_or_else(|| PathBuf::from(&plot.output));
    let pattern = args
        .pattern
        .unwrap_or_else(|| config.analysis.pattern.clone());
    let exclude = if args.exclude.is_empty() {
        config.analysis.exclude.clone()
    } else {
        args.exclude
    };

    let selector = SampleSelector::new(pattern)
        .with_exclude(exclude)
        .skipping(&output);
    let files = discover_samples(&dir, &selector)?;

    println!("Analyzing {} files...", files.len());
    let population = analyze_files(&files)?;

    if let Some(path) = &args.report {
        let report = CloudReport::new(files.len(), &population);
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "report written");
    }

    let centroid = if population.is_empty() {
        info!("no sample produced a result, skipping plot");
        None
    } else {
        let centroid = render_cloud(&population, &plot, &output)?;
        info!(path = %output.display(), "plot written");
        Some(centroid)
    };

    Ok(CloudOutcome {
        files: files.len(),
        population,
        centroid,
        output,
    })
}
