//! Analysis passes and their shared diagnostic types

mod builder;
mod collector;
mod pipeline;
mod resolver;

pub use builder::SymbolTableBuilder;
pub use collector::ReferenceCollector;
pub use pipeline::{analyze_files, FileAnalyzer, SourceFile};
pub use resolver::UsageResolver;

use crate::symbols::{BindingKind, Location};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a binding is referenced anywhere in its reachable scope chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Used,
    Unused,
}

impl UsageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStatus::Used => "used",
            UsageStatus::Unused => "unused",
        }
    }
}

impl std::fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity levels for classifications
///
/// Unused imports are actionable warnings; unused local definitions and
/// parameters are a secondary, lower-priority category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }

    /// Severity assigned to an unused binding of the given kind
    pub fn for_kind(kind: BindingKind) -> Self {
        if kind.is_import() {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolver output for one binding
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub name: String,
    pub kind: BindingKind,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
    pub status: UsageStatus,
    pub severity: Severity,
    /// Location of the first reference that proved usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Location>,
}

impl Classification {
    pub fn is_unused(&self) -> bool {
        self.status == UsageStatus::Unused
    }

    pub fn message(&self) -> String {
        match self.status {
            UsageStatus::Unused => {
                format!("{} '{}' is never used", self.kind.display_name(), self.name)
            }
            UsageStatus::Used => {
                format!("{} '{}' is used", self.kind.display_name(), self.name)
            }
        }
    }
}

/// A construct the builder could not analyze, reported beside (not inside)
/// the classification stream
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub location: Location,
    pub reason: String,
}

impl Warning {
    pub fn new(location: Location, reason: impl Into<String>) -> Self {
        Self {
            location,
            reason: reason.into(),
        }
    }
}

/// Options controlling which classifications are emitted and how the
/// multi-file driver runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Report unused module-level functions, classes, and variables
    pub report_local_definitions: bool,
    /// Report unused function parameters
    pub report_parameters: bool,
    /// Accept a reference inside an optional-import guard as proof of use
    pub tolerate_guarded_references: bool,
    /// Analyze files in parallel
    pub parallel: bool,
}

impl AnalyzerOptions {
    pub fn new() -> Self {
        Self {
            report_local_definitions: true,
            report_parameters: false,
            tolerate_guarded_references: false,
            parallel: true,
        }
    }

    pub fn with_local_definitions(mut self, report: bool) -> Self {
        self.report_local_definitions = report;
        self
    }

    pub fn with_parameters(mut self, report: bool) -> Self {
        self.report_parameters = report;
        self
    }

    pub fn with_guarded_tolerance(mut self, tolerate: bool) -> Self {
        self.tolerate_guarded_references = tolerate;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Fatal per-file analysis errors
///
/// Either kind aborts the offending file only; other files in a run are
/// unaffected.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// The external parser produced no usable tree
    #[error("failed to parse source: {0}")]
    Parse(String),

    /// A reference claimed a scope absent from the scope table; indicates
    /// a builder/collector contract violation upstream
    #[error("reference '{name}' at {location} refers to unknown scope {scope}")]
    Resolution {
        name: String,
        location: Location,
        scope: usize,
    },
}

/// An import or definition whose shape the builder does not recognize
///
/// Always recovered locally: the statement is skipped and surfaced on the
/// warning channel.
#[derive(Debug, Clone, Error)]
#[error("unrecognized {construct} at {location}: {reason}")]
pub struct ParseShapeError {
    pub construct: &'static str,
    pub location: Location,
    pub reason: String,
}

impl ParseShapeError {
    pub fn new(construct: &'static str, location: Location, reason: impl Into<String>) -> Self {
        Self {
            construct,
            location,
            reason: reason.into(),
        }
    }
}

impl From<ParseShapeError> for Warning {
    fn from(err: ParseShapeError) -> Self {
        Warning::new(err.location, err.to_string())
    }
}
