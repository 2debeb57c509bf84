//! Fetch command handler
//!
//! Downloads random bytes and stores them as ASCII bit files.

use crate::bits::encode_ascii;
use crate::config::Config;
use crate::error::Result;
use crate::qrng::{available_backends, get_backend};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fetch command arguments
#[derive(Args, Default)]
pub struct FetchArgs {
    /// QRNG backend (anu, pseudo)
    #[arg(long, short = 'b')]
    pub backend: Option<String>,

    /// Bytes per sample file
    #[arg(long, short = 'n')]
    pub bytes: Option<usize>,

    /// Number of sample files
    #[arg(long, short = 'c')]
    pub count: Option<usize>,

    /// File name prefix
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,

    /// Target directory
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Seed for the pseudo backend
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also keep the raw bytes under `<dir>/raw/`
    #[arg(long)]
    pub raw: bool,

    /// List available backends
    #[arg(short = 'B', long = "list-backends")]
    pub list_backends: bool,
}

/// Subdirectory holding raw copies
pub const RAW_DIR: &str = "raw";

/// Run the fetch command
pub fn run(args: FetchArgs) -> Result<()> {
    if args.list_backends {
        println!("Available QRNG backends:");
        for backend in available_backends() {
            println!("  {:8} - {}", backend.name, backend.description);
        }
        return Ok(());
    }

    let config = Config::load()?;
    execute(&config, args)?;
    Ok(())
}

/// Fetch samples and return the bit files written
pub fn execute(config: &Config, args: FetchArgs) -> Result<Vec<PathBuf>> {
    let backend_name = args.backend.unwrap_or_else(|| config.fetch.backend.clone());
    let bytes = args.bytes.unwrap_or(config.fetch.bytes);
    let count = args.count.unwrap_or(config.fetch.count);
    let prefix = args.prefix.unwrap_or_else(|| config.fetch.prefix.clone());
    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(&config.analysis.dir));

    let backend = get_backend(&backend_name, args.seed, config.anu_key())?;
    info!(backend = backend.name(), bytes, count, "fetching samples");

    fs::create_dir_all(&dir)?;
    // Not scanned by `cloud`
    let raw_dir = dir.join(RAW_DIR);
    if args.raw {
        fs::create_dir_all(&raw_dir)?;
    }

    let mut written = Vec::with_capacity(count);
    let mut index = 0;
    for _ in 0..count {
        index = next_free_index(&dir, &prefix, index + 1);
        let data = backend.bytes(bytes)?;

        let path = dir.join(format!("{}{:04}.txt", prefix, index));
        fs::write(&path, encode_ascii(&data))?;
        if args.raw {
            fs::write(raw_dir.join(format!("{}{:04}.bin", prefix, index)), &data)?;
        }

        println!(
            "Wrote {} bytes ({} bits) to {}",
            data.len(),
            data.len() * 8,
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

/// First index at or after `start` with no existing sample file
fn next_free_index(dir: &Path, prefix: &str, start: usize) -> usize {
    let mut index = start;
    while dir.join(format!("{}{:04}.txt", prefix, index)).exists() {
        debug!(index, "sample index taken");
        index += 1;
    }
    index
}
