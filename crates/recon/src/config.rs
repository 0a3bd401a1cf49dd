use std::path::Path;

use serde::Deserialize;

use crate::error::ReconError;
use crate::loader::LoadOptions;
use crate::model::DEFAULT_KEY_FIELD;
use crate::report::ReportOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            delimiter: default_delimiter(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path).map_err(|e| {
            ReconError::ConfigParse(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.key_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "key_field must not be blank".into(),
            ));
        }
        delimiter_byte(self.delimiter)
            .map_err(|msg| ReconError::ConfigValidation(format!("delimiter: {msg}")))?;
        delimiter_byte(self.report.delimiter)
            .map_err(|msg| ReconError::ConfigValidation(format!("report.delimiter: {msg}")))?;
        Ok(())
    }

    /// Loader options. Call after `validate`; an invalid delimiter falls back to ','.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: delimiter_byte(self.delimiter).unwrap_or(b','),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            delimiter: delimiter_byte(self.report.delimiter).unwrap_or(b','),
        }
    }
}

/// A delimiter must be one ASCII char that is not a quote or line break.
pub fn delimiter_byte(c: char) -> Result<u8, String> {
    if !c.is_ascii() {
        return Err(format!("{c:?} is not an ASCII character"));
    }
    match c {
        '"' | '\n' | '\r' => Err(format!("{c:?} cannot be used as a delimiter")),
        _ => Ok(c as u8),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
