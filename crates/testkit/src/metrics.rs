//! Metrics reports for headless build runs.
//!
//! Reports are exported as JSON so CI can compare runs and spot regressions
//! in energy use or build duration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Run identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601)
    pub timestamp: String,

    /// Git commit hash (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,

    /// Overall result
    pub result: TestResult,

    /// Build progress and energy accounting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildMetrics>,

    /// Save/restore metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistenceMetrics>,

    /// Execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Passed all validations
    Pass,
    /// Failed
    Fail,
    /// Skipped
    Skip,
}

/// Build progress and energy accounting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildMetrics {
    /// Ticks simulated
    pub ticks: u64,

    /// Slots launched
    pub slots_launched: usize,

    /// Cells approved for clearing
    pub cells_cleared: usize,

    /// Cells approved for placement or found already correct
    pub cells_built: usize,

    /// Total energy consumed
    pub energy_consumed: u64,

    /// Reclaimed items collected from clears
    pub items_reclaimed: u64,

    /// Whether the build reported completion
    pub finished: bool,
}

/// Save/restore metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceMetrics {
    /// State saves performed
    pub saves: usize,

    /// State restores performed
    pub restores: usize,

    /// Bytes written to state files
    pub bytes_written: u64,

    /// In-flight items dropped on restore
    pub dropped_items: usize,
}

/// Execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Wall-clock duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with a run name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                commit_hash: None,
                result: TestResult::Pass,
                build: None,
                persistence: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set commit hash
    pub fn commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.report.commit_hash = Some(hash.into());
        self
    }

    /// Set build metrics
    pub fn build_metrics(mut self, metrics: BuildMetrics) -> Self {
        self.report.build = Some(metrics);
        self
    }

    /// Set persistence metrics
    pub fn persistence(mut self, metrics: PersistenceMetrics) -> Self {
        self.report.persistence = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
