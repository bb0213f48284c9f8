//! Doc Analyzer - Endpoint documentation derived from Rust web handler source code.
//!
//! The library reads a project's source files and produces one [`endpoint::EndpointRecord`]
//! per handler URL: category, description, combined URL, representative verb, deprecation,
//! author, the handler's source text and JSON schemas of its request and response bodies.
//!
//! Handlers are functions carrying an actix-web style route attribute (`#[get("/x")]`,
//! `#[route("/x", method = "POST")]`, ...). Their controller is the enclosing module, or the
//! type of the enclosing `impl` when that type carries a mapping.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses Rust source files into syntax trees
//! 3. [`forest`] - Arranges declarations into a parent-linked forest
//! 4. [`type_resolver`] - Resolves type references against the forest
//! 5. [`comments`] - Derives authors and descriptions from doc comments
//! 6. [`route`] - Combines controller and handler mappings into URLs and verbs
//! 7. [`field_meta`] - Collects field descriptions before any schema is built
//! 8. [`validation`] - Discovers validation constraints on members
//! 9. [`schema_generator`] - Builds JSON schemas with descriptor-rich property descriptions
//! 10. [`handler`] - Reads request and response body types from handler signatures
//! 11. [`endpoint`] - Assembles endpoint records
//! 12. [`analyzer`] - Runs both phases over a forest
//! 13. [`serializer`] - Serializes the records to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use doc_analyzer::{
//!     analyzer::DocAnalyzer,
//!     config::DocAnalyzerConfig,
//!     forest::DeclarationForest,
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let forest = DeclarationForest::build(&parsed_files);
//! let config = DocAnalyzerConfig::new("/v1");
//! let records = DocAnalyzer::new(&forest, &config).analyze().unwrap();
//!
//! println!("{}", serialize_yaml(&records).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod analyzer;
pub mod attrs;
pub mod cli;
pub mod comments;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod field_meta;
pub mod forest;
pub mod handler;
pub mod parser;
pub mod route;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod type_resolver;
pub mod validation;
