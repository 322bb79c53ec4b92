//! pysweep - Fast unused-import and unused-symbol detection for Python
//!
//! This library provides static analysis capabilities to classify every
//! imported name, alias, and locally defined symbol in a Python file as
//! used or unused within that file.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Parsing** - Obtain a syntax tree via tree-sitter (or accept one
//!    produced by the caller)
//! 2. **Symbol Table Building** - Record every import binding and local
//!    definition, tagged with its scope
//! 3. **Reference Collection** - Record every identifier read-site with
//!    its enclosing scope
//! 4. **Usage Resolution** - Match references to bindings under lexical
//!    scoping and shadowing rules
//! 5. **Aggregation** - Merge per-file classifications into a run-wide
//!    report keyed by file path
//!
//! File discovery, command-line handling, and report rendering are left
//! to callers; the library consumes source text (or trees) and produces
//! structured, serializable results.

pub mod analysis;
pub mod parser;
pub mod report;
pub mod scope;
pub mod symbols;

pub use analysis::{
    analyze_files, AnalysisError, AnalyzerOptions, Classification, FileAnalyzer,
    ReferenceCollector, Severity, SourceFile, SymbolTableBuilder, UsageResolver, UsageStatus,
    Warning,
};
pub use parser::PythonParser;
pub use report::{AnalysisReport, FileFailure, FileReport, ReportAggregator, ReportStats};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbols::{Binding, BindingKind, EnclosingConstruct, Location, Reference, SymbolTable};
