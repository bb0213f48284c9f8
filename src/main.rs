//! Doc Analyzer - Command-line tool for generating endpoint documentation records.
//!
//! Scans a Rust web project, finds route-annotated handlers and writes one record per
//! handler URL, including JSON schemas of request and response bodies.
//!
//! # Usage
//!
//! ```bash
//! doc-analyzer [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! ```bash
//! doc-analyzer ./shop -o endpoints.yaml
//! doc-analyzer ./shop -f json -p /v1 -d field-descriptions.yaml
//! ```

use anyhow::Result;
use clap::Parser;
use doc_analyzer::cli;
use log::info;

fn main() -> Result<()> {
    // Parse once up front: the verbose flag decides the log level
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Doc Analyzer starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Endpoint documentation completed successfully");

    Ok(())
}
