use anyhow::Result;
use log::{debug, warn};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all Rust source files
/// and works out which module each file defines. It skips `target` and hidden directories
/// (those starting with `.`). Entries are visited in file-name order so that two scans of an
/// unchanged tree yield the same sequence.
///
/// # Example
///
/// ```no_run
/// use doc_analyzer::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// A discovered source file and the module path it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path to the `.rs` file
    pub path: PathBuf,
    /// Module path such as `crate::models::user`; `None` when the file location
    /// does not map onto Rust identifiers
    pub module_path: Option<String>,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// All discovered `.rs` files, in walk order
    pub rust_files: Vec<SourceFile>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and added to
    /// the result, but scanning continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        let module_path = module_path_for(&self.root_path, path)
                            .map(|module_path| bin_beside_lib(path, module_path));
                        if module_path.is_none() {
                            debug!("No module path for {}", path.display());
                        }
                        rust_files.push(SourceFile {
                            path: path.to_path_buf(),
                            module_path,
                        });
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

/// Target directories whose files are crate roots of their own.
const TARGET_DIRS: &[&str] = &["examples", "benches", "tests"];

/// Root of the binary crate when `src/main.rs` sits next to `src/lib.rs`.
pub const BIN_ROOT: &str = "main";

/// Derives the module path a file defines, relative to its crate root.
///
/// The library crate root is the last `src` directory on the path; without one, the
/// scan root is used. `lib.rs`, `main.rs` and `mod.rs` define their directory's module.
/// Files of `src/bin/`, `examples/`, `benches/` and `tests/` are crate roots named after
/// the target, hyphens mapped to underscores as cargo does: `examples/hello-world.rs`
/// defines `hello_world`, `src/bin/admin/jobs.rs` defines `admin::jobs`.
pub fn module_path_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            segments.push(name.to_str()?.to_string());
        }
    }

    let file_name = segments.pop()?;
    let stem = file_name.strip_suffix(".rs")?;

    let (crate_root, mut modules) = match segments.iter().rposition(|s| s == "src") {
        Some(src_index) if segments.get(src_index + 1).map(String::as_str) == Some("bin") => {
            target_root(&segments[src_index + 2..], stem)
        }
        Some(src_index) => ("crate".to_string(), segments[src_index + 1..].to_vec()),
        None => match segments
            .iter()
            .rposition(|s| TARGET_DIRS.contains(&s.as_str()))
        {
            Some(target_index) => target_root(&segments[target_index + 1..], stem),
            None => ("crate".to_string(), segments),
        },
    };

    if crate_root == "crate" && !matches!(stem, "lib" | "main" | "mod") {
        modules.push(stem.to_string());
    }

    if !is_identifier(&crate_root) || !modules.iter().all(|s| is_identifier(s)) {
        return None;
    }

    let mut module_path = crate_root;
    for module in &modules {
        module_path.push_str("::");
        module_path.push_str(module);
    }
    Some(module_path)
}

/// `src/main.rs` next to `src/lib.rs` is a separate binary crate rooted at [`BIN_ROOT`].
fn bin_beside_lib(path: &Path, module_path: String) -> String {
    let is_main = path.file_name().and_then(|s| s.to_str()) == Some("main.rs");
    if module_path == "crate" && is_main && path.with_file_name("lib.rs").is_file() {
        BIN_ROOT.to_string()
    } else {
        module_path
    }
}

/// Crate root and module segments of a file below a target directory.
fn target_root(dirs: &[String], stem: &str) -> (String, Vec<String>) {
    match dirs.split_first() {
        None => (stem.replace('-', "_"), Vec::new()),
        Some((target, modules)) => {
            let mut modules = modules.to_vec();
            if !matches!(stem, "main" | "mod") {
                modules.push(stem.to_string());
            }
            (target.replace('-', "_"), modules)
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    segment != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .rust_files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("lib.rs"), "pub fn test() {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 2);
        assert!(result.warnings.is_empty());

        // Sorted by file name
        assert_eq!(file_names(&result), vec!["lib.rs", "main.rs"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.rust_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_assigns_module_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub mod models;").unwrap();
        fs::write(root.join("src/models/mod.rs"), "pub mod user;").unwrap();
        fs::write(root.join("src/models/user.rs"), "pub struct User {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        let paths: Vec<_> = result
            .rust_files
            .iter()
            .map(|f| f.module_path.clone().unwrap())
            .collect();
        assert_eq!(
            paths,
            vec!["crate", "crate::models", "crate::models::user"]
        );
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["main.rs"]);
    }

    #[test]
    fn test_module_path_for_crate_layouts() {
        let root = Path::new("/work/app");
        assert_eq!(
            module_path_for(root, Path::new("/work/app/src/main.rs")).as_deref(),
            Some("crate")
        );
        assert_eq!(
            module_path_for(root, Path::new("/work/app/src/api/user_controller.rs")).as_deref(),
            Some("crate::api::user_controller")
        );
        assert_eq!(
            module_path_for(root, Path::new("/work/app/crates/web/src/dto/mod.rs")).as_deref(),
            Some("crate::dto")
        );
        assert_eq!(
            module_path_for(root, Path::new("test.rs")).as_deref(),
            Some("crate::test")
        );
    }

    #[test]
    fn test_main_beside_lib_is_a_separate_crate() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub struct Settings {}").unwrap();
        fs::write(root.join("src/main.rs"), "struct Settings {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();
        let paths: Vec<_> = result
            .rust_files
            .iter()
            .map(|f| f.module_path.clone().unwrap())
            .collect();
        assert_eq!(paths, vec!["crate", BIN_ROOT]);
    }

    #[test]
    fn test_module_path_for_target_roots() {
        let root = Path::new("/p");
        assert_eq!(
            module_path_for(root, Path::new("/p/examples/hello-world.rs")).as_deref(),
            Some("hello_world")
        );
        assert_eq!(
            module_path_for(root, Path::new("/p/examples/shop/main.rs")).as_deref(),
            Some("shop")
        );
        assert_eq!(
            module_path_for(root, Path::new("/p/benches/parse/fixtures.rs")).as_deref(),
            Some("parse::fixtures")
        );
        assert_eq!(
            module_path_for(root, Path::new("/p/tests/api.rs")).as_deref(),
            Some("api")
        );
        assert_eq!(
            module_path_for(root, Path::new("/p/src/bin/admin-tool.rs")).as_deref(),
            Some("admin_tool")
        );
        assert_eq!(
            module_path_for(root, Path::new("/p/src/bin/admin/jobs.rs")).as_deref(),
            Some("admin::jobs")
        );
        // Library modules named like target directories stay in the library
        assert_eq!(
            module_path_for(root, Path::new("/p/src/tests/mod.rs")).as_deref(),
            Some("crate::tests")
        );
    }

    #[test]
    fn test_module_path_for_non_identifier_segment() {
        let root = Path::new("/work/app");
        assert!(module_path_for(root, Path::new("/work/app/src/my-models.rs")).is_none());
        assert!(module_path_for(root, Path::new("/work/app/src/2020/user.rs")).is_none());
    }
}
