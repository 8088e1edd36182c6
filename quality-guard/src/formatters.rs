//! Report formatting for analysis results.
//!
//! This module renders an [`AnalysisResult`] as JSON, human-readable console
//! text, or Markdown.
//!
//! # Examples
//!
//! ```rust,no_run
//! use quality_guard::analysis::QualityAnalyzer;
//! use quality_guard::formatters::{FormatterConfig, HumanFormatter, ReportFormatter};
//!
//! # fn example() -> quality_guard::error::Result<()> {
//! let result = QualityAnalyzer::new().analyze_file("data/customers.csv")?;
//! let formatter = HumanFormatter::with_config(FormatterConfig::ci());
//! println!("{}", formatter.format(&result)?);
//! # Ok(())
//! # }
//! ```

use std::fmt::Write;

use crate::core::{AnalysisResult, Finding, Severity};
use crate::error::Result;

/// Configuration options for formatting analysis results.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the per-column profile section
    pub include_columns: bool,
    /// Include individual findings
    pub include_issues: bool,
    /// Maximum number of findings to display (`None` for all)
    pub max_issues: Option<usize>,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_columns: true,
            include_issues: true,
            max_issues: None,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_columns: false,
            include_issues: false,
            max_issues: Some(0),
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_columns: false,
            include_issues: true,
            max_issues: Some(50),
            use_colors: false,
            include_timestamps: true,
        }
    }

    pub fn with_columns(mut self, include: bool) -> Self {
        self.include_columns = include;
        self
    }

    pub fn with_issues(mut self, include: bool) -> Self {
        self.include_issues = include;
        self
    }

    pub fn with_max_issues(mut self, max: Option<usize>) -> Self {
        self.max_issues = max;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// The findings to render and how many were left out.
    fn visible_issues<'a>(&self, issues: &'a [Finding]) -> (&'a [Finding], usize) {
        if !self.include_issues {
            return (&[], 0);
        }
        let shown = self.max_issues.map_or(issues.len(), |max| max.min(issues.len()));
        (&issues[..shown], issues.len() - shown)
    }
}

/// Renders an analysis result into a string.
///
/// # Examples
///
/// ```rust
/// use quality_guard::core::AnalysisResult;
/// use quality_guard::formatters::ReportFormatter;
///
/// struct ScoreOnly;
///
/// impl ReportFormatter for ScoreOnly {
///     fn format(&self, result: &AnalysisResult) -> quality_guard::error::Result<String> {
///         Ok(format!("{}/100", result.quality_score))
///     }
/// }
/// ```
pub trait ReportFormatter {
    fn format(&self, result: &AnalysisResult) -> Result<String>;

    /// Formats with a configuration other than the formatter's own.
    fn format_with_config(
        &self,
        result: &AnalysisResult,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(result)
    }
}

/// Formats results as JSON in the exported result shape.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &AnalysisResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let filtered = filter_result(result, config);
        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)?
        } else {
            serde_json::to_string(&filtered)?
        };
        Ok(json)
    }
}

/// Formats results for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_symbol(severity: Severity, use_colors: bool) -> &'static str {
    match (severity, use_colors) {
        (Severity::Error, true) => "\x1b[31m🚨\x1b[0m",
        (Severity::Error, false) => "🚨",
        (Severity::Warning, true) => "\x1b[33m⚠️\x1b[0m",
        (Severity::Warning, false) => "⚠️",
        (Severity::Info, true) => "\x1b[34mℹ️\x1b[0m",
        (Severity::Info, false) => "ℹ️",
    }
}

fn score_color(score: u8) -> &'static str {
    match score {
        90..=100 => "\x1b[32m",
        70..=89 => "\x1b[33m",
        _ => "\x1b[31m",
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, result: &AnalysisResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &AnalysisResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        if config.use_colors {
            writeln!(
                output,
                "📋 Quality Score: {}{}/100\x1b[0m",
                score_color(result.quality_score),
                result.quality_score
            )?;
        } else {
            writeln!(output, "📋 Quality Score: {}/100", result.quality_score)?;
        }

        writeln!(output)?;
        writeln!(output, "File: {} ({})", result.filename, result.file_size)?;
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", result.timestamp)?;
        }
        writeln!(
            output,
            "Rows: {}  Columns: {}  Issues: {}",
            result.total_rows,
            result.total_columns,
            result.issues.len()
        )?;

        if config.include_columns && !result.columns.is_empty() {
            writeln!(output)?;
            writeln!(output, "📊 Columns:")?;
            for column in &result.columns {
                writeln!(
                    output,
                    "   {} [{}]: {}% missing, {} unique ({}%)",
                    column.name,
                    column.semantic_type,
                    column.missing_percentage,
                    column.unique_count,
                    column.unique_percentage
                )?;
            }
        }

        let (issues, hidden) = config.visible_issues(&result.issues);
        if !issues.is_empty() {
            writeln!(output)?;
            writeln!(output, "🔍 Issues Found:")?;

            for (i, issue) in issues.iter().enumerate() {
                writeln!(output)?;
                writeln!(
                    output,
                    "   {} Issue #{}: {}",
                    severity_symbol(issue.severity(), config.use_colors),
                    i + 1,
                    issue.kind()
                )?;
                if let Some(column) = issue.column() {
                    writeln!(output, "      Column: {column}")?;
                }
                writeln!(output, "      Severity: {}", issue.severity())?;
                writeln!(output, "      Count: {}", issue.count())?;
                writeln!(output, "      {}", issue.description())?;
            }

            if hidden > 0 {
                writeln!(output)?;
                writeln!(
                    output,
                    "   ... and {hidden} more issues (use --max-issues to show more)"
                )?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }
}

/// Formats results as Markdown for reports and documentation.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, result: &AnalysisResult) -> Result<String> {
        self.format_with_config(result, &self.config)
    }

    fn format_with_config(
        &self,
        result: &AnalysisResult,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        writeln!(output, "{h} Data Quality Report: {}", result.filename)?;
        writeln!(output)?;
        writeln!(output, "**Quality Score:** {}/100", result.quality_score)?;
        writeln!(output, "**File Size:** {}", result.file_size)?;
        if config.include_timestamps {
            writeln!(output, "**Timestamp:** {}", result.timestamp)?;
        }

        writeln!(output)?;
        writeln!(output, "{h}# Summary")?;
        writeln!(output)?;
        writeln!(output, "| Metric | Value |")?;
        writeln!(output, "|--------|-------|")?;
        writeln!(output, "| Rows | {} |", result.total_rows)?;
        writeln!(output, "| Columns | {} |", result.total_columns)?;
        writeln!(output, "| Issues | {} |", result.issues.len())?;
        writeln!(
            output,
            "| Errors | {} |",
            result.count_at_least(Severity::Error)
        )?;

        if config.include_columns && !result.columns.is_empty() {
            writeln!(output)?;
            writeln!(output, "{h}# Columns")?;
            writeln!(output)?;
            writeln!(output, "| Column | Type | Missing | Missing % | Unique | Unique % |")?;
            writeln!(output, "|--------|------|---------|-----------|--------|----------|")?;
            for column in &result.columns {
                writeln!(
                    output,
                    "| {} | {} | {} | {}% | {} | {}% |",
                    column.name,
                    column.semantic_type,
                    column.missing_count,
                    column.missing_percentage,
                    column.unique_count,
                    column.unique_percentage
                )?;
            }
        }

        let (issues, hidden) = config.visible_issues(&result.issues);
        if !issues.is_empty() {
            writeln!(output)?;
            writeln!(output, "{h}# Issues")?;
            writeln!(output)?;
            writeln!(output, "| # | Type | Severity | Column | Count | Description |")?;
            writeln!(output, "|---|------|----------|--------|-------|-------------|")?;
            for (i, issue) in issues.iter().enumerate() {
                writeln!(
                    output,
                    "| {} | {} | {} | {} | {} | {} |",
                    i + 1,
                    issue.kind(),
                    issue.severity(),
                    issue.column().unwrap_or("-"),
                    issue.count(),
                    issue.description().replace('|', "\\|")
                )?;
            }

            if hidden > 0 {
                writeln!(output)?;
                writeln!(
                    output,
                    "> **Note:** {hidden} additional issues not shown in this report."
                )?;
            }
        }

        Ok(output)
    }
}

fn filter_result(result: &AnalysisResult, config: &FormatterConfig) -> AnalysisResult {
    let mut filtered = result.clone();
    let (issues, _) = config.visible_issues(&result.issues);
    filtered.issues = issues.to_vec();
    if !config.include_columns {
        filtered.columns.clear();
    }
    if !config.include_timestamps {
        filtered.timestamp = String::new();
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::QualityAnalyzer;
    use crate::test_fixtures::{customers_table, reference_time};

    fn create_test_result() -> AnalysisResult {
        QualityAnalyzer::builder()
            .reference_time(reference_time())
            .build()
            .analyze_table(&customers_table(), "customers.csv", 512)
            .unwrap()
    }

    #[test]
    fn test_formatter_config() {
        let config = FormatterConfig::default();
        assert!(config.include_columns);
        assert!(config.include_issues);
        assert!(config.use_colors);

        let minimal = FormatterConfig::minimal();
        assert!(!minimal.include_issues);
        assert!(!minimal.use_colors);

        let ci = FormatterConfig::ci();
        assert!(!ci.use_colors);
        assert_eq!(ci.max_issues, Some(50));
    }

    #[test]
    fn test_json_formatter() {
        let result = create_test_result();
        let output = JsonFormatter::new().format(&result).unwrap();
        assert!(output.contains("\"filename\": \"customers.csv\""));
        assert!(output.contains("\"qualityScore\""));
        assert!(output.contains("Invalid Format"));

        let compact = JsonFormatter::new()
            .with_pretty(false)
            .format_with_config(&result, &FormatterConfig::minimal())
            .unwrap();
        assert!(compact.contains("\"issues\":[]"));
        assert!(compact.contains("\"columns\":[]"));
    }

    #[test]
    fn test_human_formatter() {
        let result = create_test_result();
        let output = HumanFormatter::new().format(&result).unwrap();
        assert!(output.contains("Quality Score"));
        assert!(output.contains("customers.csv"));
        assert!(output.contains("invalid email formats"));

        let config = FormatterConfig::default().with_colors(false);
        let output = HumanFormatter::new()
            .format_with_config(&result, &config)
            .unwrap();
        assert!(output.contains(&format!("Quality Score: {}/100", result.quality_score)));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_max_issues_truncates() {
        let result = create_test_result();
        let config = FormatterConfig::default()
            .with_colors(false)
            .with_max_issues(Some(1));
        let output = HumanFormatter::new()
            .format_with_config(&result, &config)
            .unwrap();
        assert!(output.contains("Issue #1"));
        assert!(!output.contains("Issue #2"));
        assert!(output.contains("more issues"));
    }

    #[test]
    fn test_markdown_formatter() {
        let result = create_test_result();
        let output = MarkdownFormatter::new()
            .with_heading_level(1)
            .format(&result)
            .unwrap();
        assert!(output.starts_with("# Data Quality Report: customers.csv"));
        assert!(output.contains("## Columns"));
        assert!(output.contains("| email | email |"));
        assert!(output.contains("## Issues"));
    }
}
