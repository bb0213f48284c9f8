use crate::analyzer::DocAnalyzer;
use crate::config::{load_field_overrides, DocAnalyzerConfig};
use crate::forest::DeclarationForest;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Doc Analyzer - Generate endpoint documentation records from Rust web handler source code
#[derive(Parser, Debug)]
#[command(name = "doc-analyzer")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Prefix prepended to every documented URL
    #[arg(short = 'p', long = "global-url-prefix", default_value = "")]
    pub global_url_prefix: String,

    /// YAML file of field description overrides, keyed by type path then field name
    #[arg(short = 'd', long = "field-descriptions", value_name = "FILE")]
    pub field_descriptions: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    if let Some(ref overrides) = args.field_descriptions {
        if !overrides.is_file() {
            anyhow::bail!(
                "Field descriptions file does not exist: {}",
                overrides.display()
            );
        }
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if !args.global_url_prefix.is_empty() {
        info!("Global URL prefix: {}", args.global_url_prefix);
    }
    if let Some(ref overrides) = args.field_descriptions {
        info!("Field descriptions: {}", overrides.display());
    }

    Ok(args)
}

/// Builds the run configuration, loading the override file when one is given.
pub fn build_config(args: &CliArgs) -> Result<DocAnalyzerConfig> {
    let config = DocAnalyzerConfig::new(args.global_url_prefix.clone());
    match &args.field_descriptions {
        Some(path) => Ok(config.with_field_descriptions(load_field_overrides(path)?)),
        None => Ok(config),
    }
}

/// Generates the serialized endpoint documentation of a project.
pub fn generate(args: &CliArgs) -> Result<String> {
    info!("Scanning project directory...");
    let scanner = FileScanner::new(args.project_path.clone());
    let scan_result = scanner.scan()?;

    info!("Found {} Rust files", scan_result.rust_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    info!("Parsing Rust files...");
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(|result| match result {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {}", e);
                None
            }
        })
        .collect();

    info!("Successfully parsed {} files", parsed_files.len());

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    info!("Building declaration forest...");
    let forest = DeclarationForest::build(&parsed_files);
    info!(
        "Found {} types and {} controllers",
        forest.types().len(),
        forest.controllers().len()
    );

    let config = build_config(args)?;
    let records = DocAnalyzer::new(&forest, &config).analyze()?;

    if records.is_empty() {
        warn!("No endpoints found in the project");
    }

    info!("Serializing to {:?} format...", args.output_format);
    match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&records),
        OutputFormat::Json => serialize_json(&records),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting endpoint documentation...");

    let content = generate(&args)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}
