//! Core data model: bindings, references, and the per-file symbol table

use crate::analysis::Warning;
use crate::scope::{ScopeId, ScopeTree};
use serde::Serialize;

/// A position within one source file (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of a tree-sitter node's start point
    pub fn of_node(node: &tree_sitter::Node) -> Self {
        let point = node.start_position();
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How a binding was introduced into its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `import os`
    ModuleImport,
    /// `from os import path`
    FromImport,
    /// `import x as y` or `from m import n as o`
    AliasedImport,
    /// `def name(...)`
    FunctionDef,
    /// `class Name(...)`
    ClassDef,
    /// Plain-name assignment target
    Variable,
    /// Function parameter
    Parameter,
}

impl BindingKind {
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            BindingKind::ModuleImport | BindingKind::FromImport | BindingKind::AliasedImport
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BindingKind::ModuleImport => "import",
            BindingKind::FromImport => "from-import",
            BindingKind::AliasedImport => "aliased import",
            BindingKind::FunctionDef => "function",
            BindingKind::ClassDef => "class",
            BindingKind::Variable => "variable",
            BindingKind::Parameter => "parameter",
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One name introduced into a scope by an import or a definition
#[derive(Debug, Clone)]
pub struct Binding {
    /// The name visible to references (the alias, for aliased imports)
    pub name: String,
    pub kind: BindingKind,
    pub origin: Location,
    /// Scope that owns the binding
    pub scope: ScopeId,
    /// Original imported name when the binding is an alias; diagnostic only
    pub alias_of: Option<String>,
    /// Source module of an import binding; diagnostic only
    pub module: Option<String>,
}

impl Binding {
    pub fn new(name: impl Into<String>, kind: BindingKind, origin: Location, scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            kind,
            origin,
            scope,
            alias_of: None,
            module: None,
        }
    }

    pub fn with_alias_of(mut self, original: impl Into<String>) -> Self {
        self.alias_of = Some(original.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

/// Syntactic construct a reference sits inside, when it matters to usage
/// resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnclosingConstruct {
    /// Inside a `try` statement that imports a module and catches
    /// `ImportError`/`ModuleNotFoundError`
    OptionalImportGuard,
}

/// One read of a name, excluding its own declaration
#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub location: Location,
    /// Enclosing scope at the use site
    pub scope: ScopeId,
    pub enclosing_construct: Option<EnclosingConstruct>,
}

impl Reference {
    pub fn new(name: impl Into<String>, location: Location, scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            location,
            scope,
            enclosing_construct: None,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.enclosing_construct == Some(EnclosingConstruct::OptionalImportGuard)
    }
}

/// Symbol table for one file: bindings in declaration order, the scope
/// tree they live in, and warnings for constructs the builder skipped
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub bindings: Vec<Binding>,
    pub scopes: ScopeTree,
    pub warnings: Vec<Warning>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            scopes: ScopeTree::new(),
            warnings: Vec::new(),
        }
    }

    /// Bindings of import kinds, in declaration order
    pub fn imports(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|b| b.kind.is_import())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
