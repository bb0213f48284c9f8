use std::path::PathBuf;

/// Result type alias for the documentation run
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the documentation run
///
/// File access, parsing and output go through `anyhow` in the scanner, parser,
/// serializer and CLI; this enum only carries failures of the analysis itself.
#[derive(Debug)]
pub enum Error {
    /// A type declaration whose fully-qualified name cannot be determined.
    /// Fatal for the whole run: the only remedy is fixing the project layout.
    QualifierAbsent { type_name: String, file: PathBuf },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::QualifierAbsent { type_name, file } => write!(
                f,
                "Cannot determine the fully-qualified name of `{}` declared in {}",
                type_name,
                file.display()
            ),
        }
    }
}

impl std::error::Error for Error {}
