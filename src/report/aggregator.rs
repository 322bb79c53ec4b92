//! Merges per-file results into a run-wide report
//!
//! Files are keyed by path, per-file declaration order is preserved
//! untouched, and failed files are carried alongside instead of being
//! dropped silently.

use super::FileReport;
use crate::analysis::AnalysisError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A file whose analysis aborted, with the error that stopped it
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary counters over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub files_analyzed: usize,
    /// Files with at least one unused binding
    pub files_affected: usize,
    pub bindings_total: usize,
    pub unused_total: usize,
    pub unused_imports: usize,
    pub unused_locals: usize,
    pub unused_parameters: usize,
    pub warnings_total: usize,
}

impl ReportStats {
    pub fn from_files(files: &BTreeMap<PathBuf, FileReport>) -> Self {
        let mut stats = Self {
            files_analyzed: files.len(),
            ..Self::default()
        };

        for report in files.values() {
            stats.bindings_total += report.classifications.len();
            stats.warnings_total += report.warnings.len();

            let mut affected = false;
            for entry in report.unused() {
                affected = true;
                stats.unused_total += 1;
                if entry.kind.is_import() {
                    stats.unused_imports += 1;
                } else if entry.kind == crate::symbols::BindingKind::Parameter {
                    stats.unused_parameters += 1;
                } else {
                    stats.unused_locals += 1;
                }
            }
            if affected {
                stats.files_affected += 1;
            }
        }

        stats
    }
}

/// The merged result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Per-file reports in path order
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub stats: ReportStats,
}

impl AnalysisReport {
    pub fn file(&self, path: &std::path::Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Collects per-file reports and produces the merged result
pub struct ReportAggregator {
    files: BTreeMap<PathBuf, FileReport>,
    failures: Vec<FileFailure>,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Add one file's results; a repeated path replaces the earlier entry
    pub fn insert(&mut self, report: FileReport) {
        self.files.insert(report.path.clone(), report);
    }

    /// Record a file whose analysis aborted
    pub fn record_failure(&mut self, path: PathBuf, error: AnalysisError) {
        self.failures.push(FileFailure {
            path,
            error: error.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.failures.is_empty()
    }

    /// Produce the merged report, files ordered by path
    pub fn finish(self) -> AnalysisReport {
        let stats = ReportStats::from_files(&self.files);
        AnalysisReport {
            files: self.files.into_values().collect(),
            failures: self.failures,
            stats,
        }
    }
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}
