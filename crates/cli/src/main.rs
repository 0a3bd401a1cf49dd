// csvrecon CLI - compare two keyed CSV exports field by field

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use csvrecon_cli::exit_codes::{recon_exit_code, EXIT_DIFFS, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use csvrecon_cli::render;
use csvrecon_engine::config::delimiter_byte;
use csvrecon_engine::loader::source_label;
use csvrecon_engine::{
    reconcile_with, summarize, write_report_with, CompareConfig, Difference, ReconError,
};

#[derive(Parser)]
#[command(name = "csvrecon")]
#[command(about = "Reconcile two keyed CSV exports and report field-level differences")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files and list every difference (exit 0 = identical, exit 1 = differences)
    #[command(after_help = "\
Examples:
  csvrecon compare january.csv february.csv
  csvrecon compare a.csv b.csv --key policy_id --out json
  csvrecon compare a.csv b.csv --report field-report.csv
  csvrecon compare a.csv b.csv --config recon.toml --out csv > diffs.csv")]
    Compare {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output format for the difference list
        #[arg(long, default_value = "table")]
        out: DiffOutputFormat,

        /// Also write the per-field report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Quiet mode - suppress the stderr status line
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Compare two files and print per-field difference counts
    #[command(after_help = "\
Examples:
  csvrecon summary a.csv b.csv
  csvrecon summary a.csv b.csv --out csv")]
    Summary {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output format for the summary
        #[arg(long, default_value = "table")]
        out: SummaryOutputFormat,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// First file (file 1)
    file_a: PathBuf,

    /// Second file (file 2)
    file_b: PathBuf,

    /// Key column (matched exactly, then case-insensitively) [default: POLICY_NO]
    #[arg(long, short = 'k', env = "CSVRECON_KEY")]
    key: Option<String>,

    /// TOML config file (key_field, delimiter, report.delimiter)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input CSV delimiter [default: ,]
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DiffOutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryOutputFormat {
    Table,
    Json,
    Csv,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("CSVRECON_REVISION"),
        ")",
        "\nengine:  csvrecon-engine ",
        env!("CARGO_PKG_VERSION"),
        "\ntarget:  ",
        env!("CSVRECON_TARGET"),
        " (",
        env!("CSVRECON_PROFILE"),
        ")",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --log
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compare {
            sources,
            out,
            report,
            quiet,
        } => cmd_compare(sources, out, report, quiet),
        Commands::Summary { sources, out } => cmd_summary(sources, out),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Exit with `code` without printing anything.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::KeyColumnMissing { .. } => {
                Some("use --key to name the key column".to_string())
            }
            ReconError::DuplicateKeys { .. } => {
                Some("key values must be unique within each file".to_string())
            }
            ReconError::EmptyReport => {
                Some("the files match, so there is nothing to report".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

// ============================================================================
// compare / summary
// ============================================================================

fn cmd_compare(
    sources: SourceArgs,
    out: DiffOutputFormat,
    report: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = resolve_config(&sources)?;
    let differences = run_compare(&sources, &config)?;

    let label_a = source_label(&sources.file_a);
    let label_b = source_label(&sources.file_b);

    let bytes = match out {
        DiffOutputFormat::Table => {
            render::differences_table(&differences, &label_a, &label_b).into_bytes()
        }
        DiffOutputFormat::Json => {
            let mut json = render::differences_json(&differences)
                .map_err(|e| CliError::io(e.to_string()))?;
            json.push('\n');
            json.into_bytes()
        }
        DiffOutputFormat::Csv => {
            render::differences_csv(&differences, config.load_options().delimiter)
                .map_err(|e| CliError::io(e.to_string()))?
        }
    };
    write_stdout(&bytes)?;

    if !quiet {
        eprintln!("{}", render::status_line(&differences, &label_a, &label_b));
    }

    if let Some(path) = report {
        write_report_with(&differences, Some(&path), &config.report_options())?;
        if !quiet {
            eprintln!("Report saved: {}", path.display());
        }
    }

    if differences.is_empty() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_DIFFS))
    }
}

fn cmd_summary(sources: SourceArgs, out: SummaryOutputFormat) -> Result<(), CliError> {
    let config = resolve_config(&sources)?;
    let differences = run_compare(&sources, &config)?;
    let rows = summarize(&differences);

    let bytes = match out {
        SummaryOutputFormat::Table => render::summary_table(&rows).into_bytes(),
        SummaryOutputFormat::Json => {
            let mut json = render::summary_json(&rows).map_err(|e| CliError::io(e.to_string()))?;
            json.push('\n');
            json.into_bytes()
        }
        SummaryOutputFormat::Csv => {
            csvrecon_engine::report::render_report(&rows, &config.report_options())?
        }
    };
    write_stdout(&bytes)
}

// ============================================================================
// Helpers
// ============================================================================

/// Config file (if any), then flag overrides, then validation.
fn resolve_config(sources: &SourceArgs) -> Result<CompareConfig, CliError> {
    let mut config = match &sources.config {
        Some(path) => CompareConfig::from_path(path)?,
        None => CompareConfig::default(),
    };

    if let Some(key) = &sources.key {
        config.key_field = key.trim().to_string();
    }
    if let Some(delimiter) = sources.delimiter {
        delimiter_byte(delimiter)
            .map_err(|msg| CliError::args(format!("--delimiter: {msg}")))?;
        config.delimiter = delimiter;
    }

    if config.key_field.is_empty() {
        return Err(CliError::args("key column name is blank")
            .with_hint("pass --key, e.g. --key POLICY_NO"));
    }
    config.validate()?;
    Ok(config)
}

fn run_compare(sources: &SourceArgs, config: &CompareConfig) -> Result<Vec<Difference>, CliError> {
    check_distinct(&sources.file_a, &sources.file_b);
    debug!(
        "comparing {} and {} by '{}'",
        sources.file_a.display(),
        sources.file_b.display(),
        config.key_field
    );
    Ok(reconcile_with(&sources.file_a, &sources.file_b, config)?)
}

fn check_distinct(file_a: &Path, file_b: &Path) {
    if file_a == file_b {
        tracing::warn!("both sides point at {}; expect no differences", file_a.display());
    }
}

fn write_stdout(bytes: &[u8]) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(bytes)
        .and_then(|()| handle.flush())
        .map_err(|e| CliError::io(e.to_string()))
}
