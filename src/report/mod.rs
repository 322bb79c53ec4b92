//! Structured analysis results for external reporting layers
//!
//! Rendering (terminal, JSON, SARIF, ...) is a caller concern; everything
//! here is plain serializable data.

mod aggregator;

pub use aggregator::{AnalysisReport, FileFailure, ReportAggregator, ReportStats};

use crate::analysis::{Classification, Warning};
use serde::Serialize;
use std::path::PathBuf;

/// Results for one analyzed file
///
/// Classifications appear in declaration order, so unused imports can be
/// listed in source order. Warnings ride beside the classification stream
/// so callers can distinguish "confirmed unused" from "could not
/// determine".
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub classifications: Vec<Classification>,
    pub warnings: Vec<Warning>,
}

impl FileReport {
    /// Unused entries only, in source order
    pub fn unused(&self) -> impl Iterator<Item = &Classification> {
        self.classifications.iter().filter(|c| c.is_unused())
    }

    /// Unused import entries only, in source order
    pub fn unused_imports(&self) -> impl Iterator<Item = &Classification> {
        self.unused().filter(|c| c.kind.is_import())
    }
}
