//! Sample discovery and batch analysis
//!
//! Finds sample files by glob, runs the loader and the estimator on each and
//! hands back the collected population. Nothing here renders; the cloud is
//! drawn by the caller once all files are processed.

use crate::bits::load_bits;
use crate::cloud::{FileMetrics, ResultPopulation};
use crate::error::Result;
use crate::metrics::compute;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which files of a directory count as samples
#[derive(Debug, Clone)]
pub struct SampleSelector {
    /// Glob over the file name (`*` any run, `?` one character)
    pub pattern: String,
    /// File name suffixes to skip
    pub exclude: Vec<String>,
    /// Paths to skip regardless of name (e.g. the output image)
    pub skip_paths: Vec<PathBuf>,
}

impl SampleSelector {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            exclude: Vec::new(),
            skip_paths: Vec::new(),
        }
    }

    pub fn with_exclude(mut self, exclude: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn skipping(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// Whether a file name is selected by pattern and suffix rules
    pub fn accepts_name(&self, name: &str) -> bool {
        glob_match(&self.pattern, name) && !self.exclude.iter().any(|s| name.ends_with(s.as_str()))
    }

    fn is_skipped(&self, path: &Path) -> bool {
        self.skip_paths.iter().any(|skip| same_file(skip, path))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Wildcard match on a whole file name
///
/// Only `*` (any run) and `?` (one character) are special; `[...]` classes
/// are matched literally.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();

    let (mut pi, mut ni) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ni < n.len() {
        match p.get(pi) {
            Some('*') => {
                backtrack = Some((pi, ni));
                pi += 1;
            }
            Some(&c) if c == '?' || c == n[ni] => {
                pi += 1;
                ni += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    pi = star + 1;
                    ni = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

/// Regular files in `dir` accepted by the selector, sorted by name
pub fn discover_samples(dir: &Path, selector: &SampleSelector) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };

        if selector.accepts_name(name) && !selector.is_skipped(&path) {
            files.push(path);
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered samples");
    Ok(files)
}

/// Metrics for a single bit sequence, `None` when it has too few events
pub fn analyze_bits(label: &str, bits: &[u8]) -> Option<FileMetrics> {
    let metrics = compute(bits)?;
    Some(FileMetrics {
        path: label.to_string(),
        bits: bits.len(),
        events: bits.iter().filter(|&&b| b == 1).count(),
        metrics,
    })
}

/// Load and analyse every file in order
///
/// Files with too few set bits are skipped; read errors abort the batch.
pub fn analyze_files(files: &[PathBuf]) -> Result<ResultPopulation> {
    let mut population = ResultPopulation::new();

    for path in files {
        let bits = load_bits(path)?;
        let label = path.display().to_string();

        match analyze_bits(&label, &bits) {
            Some(entry) => {
                debug!(
                    path = %label,
                    b = entry.metrics.burstiness,
                    m = entry.metrics.memory,
                    "analysed sample"
                );
                population.push(entry);
            }
            None => debug!(path = %label, bits = bits.len(), "too few events, skipped"),
        }
    }

    info!(
        files = files.len(),
        valid = population.len(),
        "analysis finished"
    );
    Ok(population)
}
