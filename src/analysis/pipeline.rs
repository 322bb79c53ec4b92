//! Per-file pipeline and the multi-file driver
//!
//! Each file runs Builder -> Collector -> Resolver in isolation; files
//! fan out one rayon task apiece and fold into the aggregator afterwards.

use super::{
    AnalysisError, AnalyzerOptions, ReferenceCollector, SymbolTableBuilder, UsageResolver, Warning,
};
use crate::parser::PythonParser;
use crate::report::{AnalysisReport, FileReport, ReportAggregator};
use crate::symbols::Location;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tree_sitter::Tree;

/// Source text for one file, as handed over by the caller
///
/// File discovery is the caller's concern; nothing here touches the
/// filesystem.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Runs the full analysis pipeline for single files
pub struct FileAnalyzer {
    parser: PythonParser,
    options: AnalyzerOptions,
}

impl FileAnalyzer {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Result<Self, AnalysisError> {
        Ok(Self {
            parser: PythonParser::new()?,
            options,
        })
    }

    /// Parse and analyze one file's source text
    pub fn analyze(&mut self, path: &Path, source: &str) -> Result<FileReport, AnalysisError> {
        let tree = self.parser.parse(source)?;
        self.analyze_tree(path, &tree, source)
    }

    /// Analyze a syntax tree produced elsewhere
    ///
    /// This is the external-parser entry point: the tree must belong to
    /// `source`.
    pub fn analyze_tree(
        &self,
        path: &Path,
        tree: &Tree,
        source: &str,
    ) -> Result<FileReport, AnalysisError> {
        debug!(path = %path.display(), "analyzing file");

        let mut table = SymbolTableBuilder::new().build(tree, source);
        let references = ReferenceCollector::new().collect(tree, source);

        if tree.root_node().has_error() {
            table.warnings.push(Warning::new(
                Location::new(1, 1),
                "source contains syntax errors; results may be incomplete",
            ));
        }

        let classifications =
            UsageResolver::with_options(self.options.clone()).resolve(&table, &references)?;

        Ok(FileReport {
            path: path.to_path_buf(),
            classifications,
            warnings: table.warnings,
        })
    }
}

/// Analyze a batch of files and merge the results
///
/// Each file is independent; a file that fails is recorded in the report
/// and never takes the rest of the run down with it.
pub fn analyze_files(files: &[SourceFile], options: &AnalyzerOptions) -> AnalysisReport {
    info!(files = files.len(), "starting analysis run");

    let analyze_one = |file: &SourceFile| -> (PathBuf, Result<FileReport, AnalysisError>) {
        let result = FileAnalyzer::with_options(options.clone())
            .and_then(|mut analyzer| analyzer.analyze(&file.path, &file.content));
        (file.path.clone(), result)
    };

    let outcomes: Vec<_> = if options.parallel {
        files.par_iter().map(analyze_one).collect()
    } else {
        files.iter().map(analyze_one).collect()
    };

    // single writer: fold completed per-file results sequentially
    let mut aggregator = ReportAggregator::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => aggregator.insert(report),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "file analysis failed");
                aggregator.record_failure(path, err);
            }
        }
    }

    let report = aggregator.finish();
    info!(
        files = report.stats.files_analyzed,
        unused = report.stats.unused_total,
        failures = report.failures.len(),
        "analysis run complete"
    );
    report
}
