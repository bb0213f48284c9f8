use crate::scanner::SourceFile;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// AST (Abstract Syntax Tree) parser for Rust source files.
///
/// The `AstParser` uses the `syn` crate to parse Rust source code into an abstract syntax tree.
/// The source text is kept next to the tree so that handler snippets can be cut out of it later.
///
/// # Example
///
/// ```no_run
/// use doc_analyzer::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs"), Some("crate".to_string())).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Module path the file defines, if it could be derived
    pub module_path: Option<String>,
    /// The original source text
    pub content: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Rust syntax
    pub fn parse_file(path: &Path, module_path: Option<String>) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path.to_path_buf(), module_path, content)
    }

    /// Parses already loaded source text.
    pub fn parse_source(
        path: PathBuf,
        module_path: Option<String>,
        content: String,
    ) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        debug!("Successfully parsed file: {}", path.display());

        Ok(ParsedFile {
            path,
            module_path,
            content,
            syntax_tree,
        })
    }

    /// Parses multiple Rust source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings, so partial documentation can still be
    /// produced when some files have syntax errors.
    pub fn parse_files(files: &[SourceFile]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", files.len());

        let results: Vec<Result<ParsedFile>> = files
            .iter()
            .map(|file| {
                Self::parse_file(&file.path, file.module_path.clone()).map_err(|e| {
                    warn!("Failed to parse {}: {}", file.path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> SourceFile {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        SourceFile {
            path: file_path,
            module_path: Some(format!("crate::{}", name.trim_end_matches(".rs"))),
        }
    }

    #[test]
    fn test_parse_valid_rust_file_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let code = r#"
            /// A user
            pub struct User {
                pub id: u32,
            }
        "#;

        let file = create_temp_file(&temp_dir, "valid.rs", code);
        let parsed = AstParser::parse_file(&file.path, file.module_path.clone()).unwrap();

        assert_eq!(parsed.path, file.path);
        assert_eq!(parsed.module_path.as_deref(), Some("crate::valid"));
        assert_eq!(parsed.content, code);
        assert_eq!(parsed.syntax_tree.items.len(), 1);
    }

    #[test]
    fn test_parse_invalid_rust_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_temp_file(&temp_dir, "invalid.rs", "fn broken( { let x = ; }");

        let err = AstParser::parse_file(&file.path, None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse Rust syntax"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = AstParser::parse_file(Path::new("/nonexistent/file.rs"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_parse_files_batch_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();

        let file1 = create_temp_file(&temp_dir, "file1.rs", "pub fn hello() {}");
        let file2 = create_temp_file(&temp_dir, "file2.rs", "pub fn broken( {");
        let file3 = create_temp_file(&temp_dir, "file3.rs", "pub struct World;");

        let results = AstParser::parse_files(&[file1.clone(), file2, file3.clone()]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(results[0].as_ref().unwrap().path, file1.path);
        assert_eq!(results[2].as_ref().unwrap().path, file3.path);
    }

    #[test]
    fn test_parse_source_without_module_path() {
        let parsed =
            AstParser::parse_source(PathBuf::from("my-file.rs"), None, "struct A;".to_string())
                .unwrap();
        assert!(parsed.module_path.is_none());
        assert!(!parsed.syntax_tree.items.is_empty());
    }
}
