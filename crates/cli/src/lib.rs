//! # `bookpipe` CLI Library Crate
//!
//! Argument parsing and the top-level run for the `bookpipe` binary. Flags
//! override the layered configuration loaded by [`bookpipe::load_config`].

use anyhow::{Context, Result};
use bookpipe::{
    catalogue_page_url, load_config, render_books, AppConfig, OutputFormat, Pipeline,
    TransformKind,
};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file. Defaults to ./bookpipe.yml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Catalogue page URL to fetch.
    #[arg(long, conflicts_with = "page")]
    pub url: Option<String>,
    /// Fetch books.toscrape.com catalogue page N instead of a full URL.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,
    /// Number of leading books that must exist and get printed.
    #[arg(long)]
    pub count: Option<usize>,
    /// Output format: text or json.
    #[arg(long)]
    pub format: Option<OutputFormat>,
    /// Transform kind: stdin (subprocess) or rest (HTTP adapter).
    #[arg(long)]
    pub transform: Option<TransformKind>,
    /// Program run by the stdin transform.
    #[arg(long)]
    pub program: Option<String>,
    /// Argument for the transform program. Repeat for several; replaces configured args.
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Working directory for the transform program.
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
    /// Endpoint URL for the rest transform.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Log at debug level. Ignored when RUST_LOG is set.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layers the flags that were given on top of `config`.
    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(page) = self.page {
            config.url = catalogue_page_url(page);
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(kind) = self.transform {
            config.transform.kind = kind;
        }
        if let Some(program) = &self.program {
            config.transform.program = program.clone();
        }
        if !self.args.is_empty() {
            config.transform.args = self.args.clone();
        }
        if let Some(dir) = &self.working_dir {
            config.transform.working_dir = Some(dir.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.transform.endpoint = endpoint.clone();
        }
        config
    }

    /// Loads the configuration layers, applies the flags, then validates.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let config = load_config(self.config.as_deref())?;
        Ok(self.apply_overrides(config).validate()?)
    }
}

/// Log filter for the binary: `RUST_LOG` when it is set and parses, else
/// `bookpipe=info` (`bookpipe=debug` with `verbose`).
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default = if verbose {
        "bookpipe=debug"
    } else {
        "bookpipe=info"
    };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

// --- Public Entrypoint ---

/// Runs the pipeline once and prints the selected books to stdout.
///
/// A failure to reach the catalogue is reported on stderr and the run ends
/// normally. Every other failure is returned to the caller.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    info!(
        "Starting run: url={}, transform={:?}, count={}",
        config.url, config.transform.kind, config.count
    );

    let pipeline = Pipeline::from_config(&config).context("Failed to set up pipeline")?;
    let books = match pipeline.run().await {
        Ok(books) => books,
        Err(e) if e.is_transport() => {
            debug!("Catalogue unreachable, skipping transform");
            eprintln!("Error: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_books(&mut out, &books, config.format).context("Failed to write books to stdout")?;
    Ok(())
}
