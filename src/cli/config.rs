//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "plot.seed")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => print!("{}", render_all(&config)),

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config(
                "Must specify a key to set a value".to_string(),
            ));
        }
    }

    Ok(())
}

/// All configuration values, TOML-like, with the API key masked
fn render_all(config: &Config) -> String {
    let mut out = String::new();

    out.push_str("[analysis]\n");
    out.push_str(&format!("dir = \"{}\"\n", config.analysis.dir));
    out.push_str(&format!("pattern = \"{}\"\n", config.analysis.pattern));
    out.push_str(&format!("exclude = {:?}\n\n", config.analysis.exclude));

    let plot = &config.plot;
    out.push_str("[plot]\n");
    out.push_str(&format!("output = \"{}\"\n", plot.output));
    out.push_str(&format!("width = {}\n", plot.width));
    out.push_str(&format!("height = {}\n", plot.height));
    out.push_str(&format!("jitter_std = {}\n", plot.jitter_std));
    out.push_str(&format!("bw_adjust = {}\n", plot.bw_adjust));
    out.push_str(&format!("kde_levels = {}\n", plot.kde_levels));
    out.push_str(&format!("kde_thresh = {}\n", plot.kde_thresh));
    out.push_str(&format!("kde_grid = {}\n", plot.kde_grid));
    match plot.seed {
        Some(seed) => out.push_str(&format!("seed = {}\n\n", seed)),
        None => out.push_str("# seed unset, jitter differs per run\n\n"),
    }

    out.push_str("[fetch]\n");
    out.push_str(&format!("backend = \"{}\"\n", config.fetch.backend));
    out.push_str(&format!("bytes = {}\n", config.fetch.bytes));
    out.push_str(&format!("count = {}\n", config.fetch.count));
    out.push_str(&format!("prefix = \"{}\"\n\n", config.fetch.prefix));

    out.push_str("[api_keys]\n");
    if config.anu_key().is_some() {
        out.push_str("anu = \"***\" # configured\n");
    } else {
        out.push_str("anu = \"\" # not configured\n");
    }

    out
}
