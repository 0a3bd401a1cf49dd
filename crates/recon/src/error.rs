use std::fmt;
use std::path::PathBuf;

/// Duplicate key values found in one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeys {
    /// Source label (file name) the duplicates were found in.
    pub source: String,
    /// Each repeated key value, once, in order of its second occurrence.
    pub keys: Vec<String>,
}

#[derive(Debug)]
pub enum ReconError {
    /// Source path does not exist.
    NotFound { path: PathBuf },
    /// Source has no header row, is not UTF-8, or is not parseable as CSV.
    Format { source: String, message: String },
    /// Key column absent under both exact and case-insensitive match.
    KeyColumnMissing { source: String, key: String },
    /// Key values could not be ordered. Reserved for non-text key types.
    Sort { source: String },
    /// One or both sources have repeated key values.
    DuplicateKeys {
        source_a: Option<DuplicateKeys>,
        source_b: Option<DuplicateKeys>,
    },
    /// A report was requested for zero differences.
    EmptyReport,
    /// Report destination unset or unwritable.
    Destination { path: Option<PathBuf>, message: String },
    /// Read failure on an existing source.
    Io { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank key field, bad delimiter).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Format { source, message } => write!(f, "{source}: {message}"),
            Self::KeyColumnMissing { source, key } => {
                write!(f, "{source}: key column '{key}' is missing")
            }
            Self::Sort { source } => {
                write!(f, "{source}: key values cannot be sorted, check the key column")
            }
            Self::DuplicateKeys { source_a, source_b } => {
                let mut first = true;
                for dups in [source_a, source_b].into_iter().flatten() {
                    if !first {
                        writeln!(f)?;
                    }
                    first = false;
                    write!(
                        f,
                        "{} contains duplicate keys: {}",
                        dups.source,
                        dups.keys.join(", ")
                    )?;
                }
                Ok(())
            }
            Self::EmptyReport => write!(f, "report not saved: there are no differences"),
            Self::Destination { path: None, message } => {
                write!(f, "report destination: {message}")
            }
            Self::Destination { path: Some(path), message } => {
                write!(f, "report destination {}: {message}", path.display())
            }
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
