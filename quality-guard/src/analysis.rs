//! End-to-end dataset analysis.
//!
//! [`QualityAnalyzer`] loads a dataset, profiles every column, runs the
//! detector suite and scores the result:
//!
//! ```text
//! DataSource ──load──▶ Table ──profile──▶ [ColumnProfile]
//!                        │                      │
//!                        └──────detect──────────┤
//!                                               ▼
//!                                  [Finding] ──score──▶ AnalysisResult
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use quality_guard::analysis::QualityAnalyzer;
//!
//! # fn example() -> quality_guard::error::Result<()> {
//! let result = QualityAnalyzer::new().analyze_file("data/products.csv")?;
//! println!("{}: {}/100", result.filename, result.quality_score);
//! for issue in &result.issues {
//!     println!("[{}] {}", issue.severity(), issue.description());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use chrono::{Local, NaiveDateTime, Utc};
use tracing::{info, instrument};

use crate::analyzers::{ColumnProfile, ColumnProfiler};
use crate::core::{format_file_size, format_timestamp, AnalysisResult, Finding};
use crate::detectors::{DetectionContext, DetectorSuite};
use crate::error::Result;
use crate::scoring::QualityScorer;
use crate::sources::{CsvOptions, CsvSource, DataSource};
use crate::table::Table;

/// Runs the full analysis pipeline.
#[derive(Debug)]
pub struct QualityAnalyzer {
    csv_options: CsvOptions,
    reference_time: Option<NaiveDateTime>,
    profiler: ColumnProfiler,
    detectors: DetectorSuite,
    scorer: QualityScorer,
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAnalyzer {
    /// An analyzer with default CSV options and the standard detectors.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> QualityAnalyzerBuilder {
        QualityAnalyzerBuilder::default()
    }

    /// Analyzes a delimited file.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<AnalysisResult> {
        let source = CsvSource::with_options(path.as_ref(), self.csv_options.clone());
        self.analyze_source(&source)
    }

    /// Analyzes any data source.
    #[instrument(skip(self, source), fields(source = %source.name()))]
    pub fn analyze_source(&self, source: &dyn DataSource) -> Result<AnalysisResult> {
        let table = source.load()?;
        let file_size = source.size_bytes()?;
        self.analyze_table(&table, source.name(), file_size)
    }

    /// Analyzes a table that is already in memory.
    #[instrument(skip(self, table, filename), fields(rows = table.num_rows(), columns = table.num_columns()))]
    pub fn analyze_table(
        &self,
        table: &Table,
        filename: impl Into<String>,
        file_size: u64,
    ) -> Result<AnalysisResult> {
        let profiles = self.profiler.profile_table(table);
        let issues = self.detect(table, &profiles)?;
        let quality_score = self.scorer.score(&profiles, &issues)?;

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            findings = issues.len(),
            score = quality_score,
            "Analysis completed"
        );

        Ok(AnalysisResult {
            filename: filename.into(),
            file_size: format_file_size(file_size),
            timestamp: format_timestamp(Utc::now()),
            total_rows: table.num_rows(),
            total_columns: table.num_columns(),
            columns: profiles,
            issues,
            quality_score,
        })
    }

    /// Runs only the detector suite.
    pub fn detect(&self, table: &Table, profiles: &[ColumnProfile]) -> Result<Vec<Finding>> {
        let context = DetectionContext::new(table, profiles, self.now());
        self.detectors.run(&context)
    }

    fn now(&self) -> NaiveDateTime {
        self.reference_time
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Builder for [`QualityAnalyzer`].
#[derive(Debug, Default)]
pub struct QualityAnalyzerBuilder {
    csv_options: CsvOptions,
    reference_time: Option<NaiveDateTime>,
    profiler: Option<ColumnProfiler>,
    detectors: Option<DetectorSuite>,
}

impl QualityAnalyzerBuilder {
    pub fn csv_options(mut self, options: CsvOptions) -> Self {
        self.csv_options = options;
        self
    }

    /// Fixes "now" for future-date checks. Defaults to the local clock.
    pub fn reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn profiler(mut self, profiler: ColumnProfiler) -> Self {
        self.profiler = Some(profiler);
        self
    }

    /// Replaces the standard detector suite.
    pub fn detectors(mut self, detectors: DetectorSuite) -> Self {
        self.detectors = Some(detectors);
        self
    }

    pub fn build(self) -> QualityAnalyzer {
        QualityAnalyzer {
            csv_options: self.csv_options,
            reference_time: self.reference_time,
            profiler: self.profiler.unwrap_or_default(),
            detectors: self.detectors.unwrap_or_else(DetectorSuite::standard),
            scorer: QualityScorer::new(),
        }
    }
}
