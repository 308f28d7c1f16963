//! # bookpipe
//!
//! Thin entrypoint: sets up logging, parses arguments and hands off to
//! [`bookpipe_cli::run`].

use anyhow::Result;
use bookpipe_cli::{log_filter, run, Cli};
use clap::Parser;
use tracing_subscriber::fmt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Setup logging. Stdout carries the books, so logs go to stderr.
    let rust_log = std::env::var("RUST_LOG").ok();
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 4. Run once and turn any unrecoverable error into a failing exit code
    if let Err(e) = run(cli).await {
        eprintln!("[bookpipe error] {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
