//! Thin wrapper around the external tree-sitter Python parser
//!
//! The analysis passes consume the concrete syntax tree as-is; no grammar
//! knowledge lives here beyond selecting the language.

use crate::analysis::AnalysisError;
use tree_sitter::{Parser, Tree};

/// Parser for Python source files
pub struct PythonParser {
    inner: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, AnalysisError> {
        let mut inner = Parser::new();
        inner
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse source text into a syntax tree
    ///
    /// Malformed input still yields a tree containing error nodes; only a
    /// parser-level failure (e.g. cancellation) is an error here.
    pub fn parse(&mut self, source: &str) -> Result<Tree, AnalysisError> {
        self.inner
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Parse("parser produced no tree".to_string()))
    }
}
