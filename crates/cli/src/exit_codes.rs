//! CLI Exit Code Registry
//!
//! Single source of truth for `csvrecon` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success, no differences                            |
//! | 1    | Differences found (like `diff(1)`)                 |
//! | 2    | Usage error (bad arguments, bad config file)       |
//! | 3    | Duplicate keys in one or both sources              |
//! | 4    | Key column missing                                 |
//! | 5    | Source has no header or cannot be parsed           |
//! | 6    | Source file not found                              |
//! | 7    | Report not written (no differences, bad target)    |
//! | 8    | Other I/O failure                                  |

use csvrecon_engine::ReconError;

/// Success - no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found.
pub const EXIT_DIFFS: u8 = 1;

/// Usage error - bad arguments, invalid config.
pub const EXIT_USAGE: u8 = 2;

/// Duplicate keys found in input.
pub const EXIT_DUPLICATE: u8 = 3;

/// Key column not present under exact or case-insensitive match.
pub const EXIT_KEY_MISSING: u8 = 4;

/// Header missing, invalid UTF-8, or malformed CSV.
pub const EXIT_FORMAT: u8 = 5;

/// Source path does not exist.
pub const EXIT_NOT_FOUND: u8 = 6;

/// Report requested for zero differences, or destination unwritable.
pub const EXIT_REPORT: u8 = 7;

/// Any other read/write failure.
pub const EXIT_IO: u8 = 8;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::NotFound { .. } => EXIT_NOT_FOUND,
        ReconError::Format { .. } | ReconError::Sort { .. } => EXIT_FORMAT,
        ReconError::KeyColumnMissing { .. } => EXIT_KEY_MISSING,
        ReconError::DuplicateKeys { .. } => EXIT_DUPLICATE,
        ReconError::EmptyReport | ReconError::Destination { .. } => EXIT_REPORT,
        ReconError::Io { .. } => EXIT_IO,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
    }
}
