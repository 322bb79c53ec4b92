//! Lexical scope tree for a single file
//!
//! Scopes are created in pre-order during tree traversal, so two
//! independent walks over the same syntax tree assign identical ids.

use serde::Serialize;

/// Identifier of a scope within one file's scope tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ScopeId(pub usize);

impl ScopeId {
    /// The module (file-level) scope, always id 0
    pub const MODULE: ScopeId = ScopeId(0);
}

/// Kind of lexical region a scope represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Module,
    Function,
    Class,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Class => "class",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One nested lexical region
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
}

/// Arena of scopes with parent links, owned by one file's analysis pass
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree containing only the module scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId::MODULE,
                parent: None,
                kind: ScopeKind::Module,
            }],
        }
    }

    /// Add a child scope and return its id
    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            kind,
        });
        id
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        id.0 < self.scopes.len()
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn kind(&self, id: ScopeId) -> Option<ScopeKind> {
        self.get(id).map(|s| s.kind)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).and_then(|s| s.parent)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Iterate a scope and its ancestors, innermost first
    pub fn chain(&self, id: ScopeId) -> ScopeChain<'_> {
        ScopeChain {
            tree: self,
            next: if self.contains(id) { Some(id) } else { None },
        }
    }

    /// Whether `inner` is `outer` or nested (at any depth) inside it
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        self.chain(inner).any(|s| s == outer)
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a scope's ancestor chain
pub struct ScopeChain<'a> {
    tree: &'a ScopeTree,
    next: Option<ScopeId>,
}

impl Iterator for ScopeChain<'_> {
    type Item = ScopeId;

    fn next(&mut self) -> Option<ScopeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
