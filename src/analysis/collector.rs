//! Reference collector - second pass over a file's syntax tree
//!
//! Records every identifier read-site that is not itself a binding
//! declaration. Attribute-access roots count as references to the root
//! name; assignment targets, imported names, and parameter names do not.
//!
//! Scope ids are assigned with the same pre-order numbering as the symbol
//! table builder, so both passes agree without sharing state.

use crate::scope::{ScopeId, ScopeKind, ScopeTree};
use crate::symbols::{EnclosingConstruct, Location, Reference};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Collector for a single file's identifier read-sites
pub struct ReferenceCollector;

impl ReferenceCollector {
    pub fn new() -> Self {
        Self
    }

    /// Walk the tree and record every reference in source order
    pub fn collect(&self, tree: &Tree, source: &str) -> Vec<Reference> {
        let mut refs = Vec::new();
        let mut scopes = ScopeTree::new();
        self.walk(
            tree.root_node(),
            Ctx {
                scope: ScopeId::MODULE,
                guarded: false,
            },
            source.as_bytes(),
            &mut scopes,
            &mut refs,
        );
        debug!(references = refs.len(), "references collected");
        refs
    }

    fn walk(
        &self,
        node: Node,
        ctx: Ctx,
        src: &[u8],
        scopes: &mut ScopeTree,
        refs: &mut Vec<Reference>,
    ) {
        match node.kind() {
            // import statements bind names; nothing inside them is a read
            "import_statement" | "import_from_statement" | "future_import_statement" => {}

            // declaration lists, not reads
            "global_statement" | "nonlocal_statement" => {}

            "identifier" => {
                let name = node_text(node, src);
                if !name.is_empty() {
                    let mut reference =
                        Reference::new(name, Location::of_node(&node), ctx.scope);
                    if ctx.guarded {
                        reference.enclosing_construct =
                            Some(EnclosingConstruct::OptionalImportGuard);
                    }
                    refs.push(reference);
                }
            }

            // `obj.method` reads `obj`; the attribute name is not a
            // standalone reference
            "attribute" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.walk(object, ctx, src, scopes, refs);
                }
            }

            "function_definition" => {
                // annotations and defaults evaluate in the enclosing scope
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.walk_parameters(params, ctx, src, scopes, refs);
                }
                if let Some(return_type) = node.child_by_field_name("return_type") {
                    self.walk(return_type, ctx, src, scopes, refs);
                }
                let inner = scopes.push(ctx.scope, ScopeKind::Function);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, ctx.in_scope(inner), src, scopes, refs);
                }
            }

            "class_definition" => {
                if let Some(superclasses) = node.child_by_field_name("superclasses") {
                    self.walk(superclasses, ctx, src, scopes, refs);
                }
                let inner = scopes.push(ctx.scope, ScopeKind::Class);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, ctx.in_scope(inner), src, scopes, refs);
                }
            }

            "assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.walk_target(left, ctx, src, scopes, refs);
                }
                if let Some(annotation) = node.child_by_field_name("type") {
                    self.walk(annotation, ctx, src, scopes, refs);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, ctx, src, scopes, refs);
                }
            }

            // `x += 1` both reads and writes x; the read counts
            "augmented_assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.walk(left, ctx, src, scopes, refs);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, ctx, src, scopes, refs);
                }
            }

            "for_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.walk_target(left, ctx, src, scopes, refs);
                }
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if node.child_by_field_name("left") != Some(child) {
                        self.walk(child, ctx, src, scopes, refs);
                    }
                }
            }

            "for_in_clause" => {
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, ctx, src, scopes, refs);
                }
            }

            // `expr as target` in with/except: the expression is read, the
            // target is bound
            "as_pattern" => {
                if let Some(first) = node.named_child(0) {
                    self.walk(first, ctx, src, scopes, refs);
                }
            }

            // walrus binds its name; only the value is a read
            "named_expression" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, ctx, src, scopes, refs);
                }
            }

            // keyword argument names are labels, not reads
            "keyword_argument" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, ctx, src, scopes, refs);
                }
            }

            "lambda" => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.walk_parameters(params, ctx, src, scopes, refs);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, ctx, src, scopes, refs);
                }
            }

            "try_statement" => {
                let ctx = if is_optional_import_guard(node, src) {
                    ctx.in_guard()
                } else {
                    ctx
                };
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk(child, ctx, src, scopes, refs);
                }
            }

            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk(child, ctx, src, scopes, refs);
                }
            }
        }
    }

    /// Walk an assignment/loop target: plain names bind, but attribute and
    /// subscript targets read their roots
    fn walk_target(
        &self,
        target: Node,
        ctx: Ctx,
        src: &[u8],
        scopes: &mut ScopeTree,
        refs: &mut Vec<Reference>,
    ) {
        match target.kind() {
            "identifier" => {}
            "tuple_pattern" | "pattern_list" | "list_pattern" => {
                let mut cursor = target.walk();
                for child in target.children(&mut cursor) {
                    self.walk_target(child, ctx, src, scopes, refs);
                }
            }
            _ => self.walk(target, ctx, src, scopes, refs),
        }
    }

    /// Walk a parameter list: names bind, annotations and defaults read
    fn walk_parameters(
        &self,
        params: Node,
        ctx: Ctx,
        src: &[u8],
        scopes: &mut ScopeTree,
        refs: &mut Vec<Reference>,
    ) {
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            match child.kind() {
                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {}
                "typed_parameter" => {
                    if let Some(annotation) = child.child_by_field_name("type") {
                        self.walk(annotation, ctx, src, scopes, refs);
                    }
                }
                "default_parameter" => {
                    if let Some(value) = child.child_by_field_name("value") {
                        self.walk(value, ctx, src, scopes, refs);
                    }
                }
                "typed_default_parameter" => {
                    if let Some(annotation) = child.child_by_field_name("type") {
                        self.walk(annotation, ctx, src, scopes, refs);
                    }
                    if let Some(value) = child.child_by_field_name("value") {
                        self.walk(value, ctx, src, scopes, refs);
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for ReferenceCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Traversal context: enclosing scope and guard marking
#[derive(Clone, Copy)]
struct Ctx {
    scope: ScopeId,
    guarded: bool,
}

impl Ctx {
    fn in_scope(self, scope: ScopeId) -> Self {
        Self { scope, ..self }
    }

    fn in_guard(self) -> Self {
        Self {
            guarded: true,
            ..self
        }
    }
}

fn node_text<'a>(node: Node<'a>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Whether a `try` statement is the optional-dependency import pattern:
/// an import in the body with an `except` clause catching import failure
fn is_optional_import_guard(try_node: Node, src: &[u8]) -> bool {
    let has_import = try_node
        .child_by_field_name("body")
        .map(|body| {
            let mut cursor = body.walk();
            let found = body.children(&mut cursor).any(|stmt| {
                matches!(
                    stmt.kind(),
                    "import_statement" | "import_from_statement"
                )
            });
            found
        })
        .unwrap_or(false);
    if !has_import {
        return false;
    }

    let mut cursor = try_node.walk();
    let found = try_node.children(&mut cursor).any(|child| {
        if child.kind() != "except_clause" {
            return false;
        }
        let mut inner = child.walk();
        let found_inner = child.children(&mut inner).any(|part| {
            if part.is_named() && part.kind() != "block" {
                let text = node_text(part, src);
                text.contains("ImportError") || text.contains("ModuleNotFoundError")
            } else {
                false
            }
        });
        found_inner
    });
    found
}
