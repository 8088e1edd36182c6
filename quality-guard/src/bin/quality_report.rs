//! Command line front-end for quality-guard.
//!
//! `quality-report analyze <file>` prints an analysis report and
//! `quality-report rows <file> --issue-type ...` prints the rows behind a
//! finding as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use quality_guard::analysis::QualityAnalyzer;
use quality_guard::error::Result;
use quality_guard::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, ReportFormatter,
};
use quality_guard::logging::{init_logging, LoggingConfig};
use quality_guard::resolver::{AffectedRowResolver, AffectedRowsQuery};
use quality_guard::sources::CsvOptions;
use quality_guard::thresholds::DEFAULT_PAGE_LIMIT;

/// Tabular data quality analysis
#[derive(Parser)]
#[command(name = "quality-report")]
#[command(about = "Profile a dataset, detect quality issues and score it")]
#[command(version)]
struct Cli {
    /// Field delimiter of the input file, a single ASCII character or `\t`
    #[arg(short, long, global = true, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "QUALITY_GUARD_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a file and print the quality report
    Analyze {
        /// Input file path
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,

        /// Maximum number of issues to display
        #[arg(long)]
        max_issues: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Print the rows behind a finding
    Rows {
        /// Input file path
        file: PathBuf,

        /// Issue type, e.g. "Missing Values"
        #[arg(short, long)]
        issue_type: String,

        /// Column the finding refers to
        #[arg(short, long)]
        column: Option<String>,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Console report
    Human,
    /// Exported result shape
    Json,
    /// Markdown report
    Markdown,
}

/// The CSV reader splits on a single byte, so only ASCII delimiters are usable.
fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    if s == "\\t" {
        return Ok(b'\t');
    }
    match s.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    }
    .with_json_format(cli.json_logs);
    if let Err(e) = init_logging(logging) {
        eprintln!("{e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let csv_options = CsvOptions {
        delimiter: cli.delimiter,
        ..Default::default()
    };

    match cli.command {
        Commands::Analyze {
            file,
            format,
            max_issues,
            no_color,
        } => {
            let result = QualityAnalyzer::builder()
                .csv_options(csv_options)
                .build()
                .analyze_file(&file)?;
            let config = FormatterConfig::default()
                .with_max_issues(max_issues)
                .with_colors(!no_color);
            let report = match format {
                OutputFormat::Human => HumanFormatter::with_config(config).format(&result)?,
                OutputFormat::Json => JsonFormatter::with_config(config).format(&result)?,
                OutputFormat::Markdown => MarkdownFormatter::with_config(config).format(&result)?,
            };
            println!("{report}");
        }
        Commands::Rows {
            file,
            issue_type,
            column,
            limit,
            offset,
        } => {
            let mut query = AffectedRowsQuery::new(issue_type).limit(limit).offset(offset);
            if let Some(column) = column {
                query = query.column(column);
            }
            let page = AffectedRowResolver::new()
                .with_csv_options(csv_options)
                .resolve_file(&file, &query)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("§").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_cli_delimiter_flag() {
        let cli = Cli::try_parse_from(["quality-report", "analyze", "data.csv", "-d", ";"]).unwrap();
        assert_eq!(cli.delimiter, b';');

        let cli = Cli::try_parse_from(["quality-report", "analyze", "data.csv"]).unwrap();
        assert_eq!(cli.delimiter, b',');

        assert!(Cli::try_parse_from(["quality-report", "-d", "é", "analyze", "data.csv"]).is_err());
    }
}
