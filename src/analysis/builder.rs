//! Symbol table builder - first pass over a file's syntax tree
//!
//! Records every import binding and local definition together with the
//! scope that owns it. Import statements the builder cannot analyze
//! (wildcard imports, malformed shapes) are skipped and surfaced on the
//! warning channel instead of failing the file.

use super::ParseShapeError;
use crate::scope::{ScopeId, ScopeKind};
use crate::symbols::{Binding, BindingKind, Location, SymbolTable};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Builder for a single file's symbol table
pub struct SymbolTableBuilder;

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Walk the tree once and record every binding
    pub fn build(&self, tree: &Tree, source: &str) -> SymbolTable {
        let mut table = SymbolTable::new();
        self.walk(tree.root_node(), ScopeId::MODULE, source.as_bytes(), &mut table);
        debug!(
            bindings = table.bindings.len(),
            scopes = table.scopes.len(),
            warnings = table.warnings.len(),
            "symbol table built"
        );
        table
    }

    fn walk(&self, node: Node, scope: ScopeId, src: &[u8], table: &mut SymbolTable) {
        match node.kind() {
            "import_statement" => match self.import_statement(node, scope, src) {
                Ok(bindings) => table.bindings.extend(bindings),
                Err(err) => table.warnings.push(err.into()),
            },
            "import_from_statement" => match self.from_import_statement(node, scope, src) {
                Ok(bindings) => table.bindings.extend(bindings),
                Err(err) => table.warnings.push(err.into()),
            },
            // `from __future__ import ...` is a compiler directive, not a
            // usable name
            "future_import_statement" => {}
            "function_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_definition(name, BindingKind::FunctionDef, scope, src, table);
                }
                let inner = table.scopes.push(scope, ScopeKind::Function);
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.record_parameters(params, inner, src, table);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, inner, src, table);
                }
            }
            "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_definition(name, BindingKind::ClassDef, scope, src, table);
                }
                let inner = table.scopes.push(scope, ScopeKind::Class);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, inner, src, table);
                }
            }
            "assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.record_assignment_target(left, scope, src, table);
                }
                // chained assignment: `a = b = value`
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, scope, src, table);
                }
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk(child, scope, src, table);
                }
            }
        }
    }

    /// Record a `def`/`class` name in its enclosing scope
    ///
    /// Class-body members are skipped: their uses travel through attribute
    /// access, which whole-file name resolution cannot observe.
    fn record_definition(
        &self,
        name_node: Node,
        kind: BindingKind,
        scope: ScopeId,
        src: &[u8],
        table: &mut SymbolTable,
    ) {
        if table.scopes.kind(scope) == Some(ScopeKind::Class) {
            return;
        }
        let name = node_text(name_node, src);
        if name.is_empty() || name == "_" || is_dunder(name) {
            return;
        }
        table.bindings.push(Binding::new(
            name,
            kind,
            Location::of_node(&name_node),
            scope,
        ));
    }

    /// Record plain-name assignment targets as variable bindings
    ///
    /// Attribute and subscript targets bind nothing; their root objects are
    /// read-sites handled by the reference collector.
    fn record_assignment_target(
        &self,
        target: Node,
        scope: ScopeId,
        src: &[u8],
        table: &mut SymbolTable,
    ) {
        match target.kind() {
            "identifier" => {
                if table.scopes.kind(scope) == Some(ScopeKind::Class) {
                    return;
                }
                let name = node_text(target, src);
                if name.is_empty() || name == "_" || is_dunder(name) {
                    return;
                }
                table.bindings.push(Binding::new(
                    name,
                    BindingKind::Variable,
                    Location::of_node(&target),
                    scope,
                ));
            }
            "tuple_pattern" | "pattern_list" | "list_pattern" => {
                let mut cursor = target.walk();
                for child in target.children(&mut cursor) {
                    self.record_assignment_target(child, scope, src, table);
                }
            }
            _ => {}
        }
    }

    /// Record function parameters in the function's own scope
    ///
    /// They always participate in shadowing; whether they are reported is
    /// decided later by the resolver's options.
    fn record_parameters(&self, params: Node, scope: ScopeId, src: &[u8], table: &mut SymbolTable) {
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            let name_node = match child.kind() {
                "identifier" => Some(child),
                "typed_parameter" => first_identifier_child(child),
                "default_parameter" | "typed_default_parameter" => child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier"),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    first_identifier_child(child)
                }
                _ => None,
            };
            if let Some(name_node) = name_node {
                let name = node_text(name_node, src);
                if name.is_empty() || name == "self" || name == "cls" || name == "_" {
                    continue;
                }
                table.bindings.push(Binding::new(
                    name,
                    BindingKind::Parameter,
                    Location::of_node(&name_node),
                    scope,
                ));
            }
        }
    }

    /// `import a`, `import a.b`, `import x as y`, comma-separated lists
    fn import_statement(
        &self,
        node: Node,
        scope: ScopeId,
        src: &[u8],
    ) -> Result<Vec<Binding>, ParseShapeError> {
        let mut bindings = Vec::new();
        let mut recognized = 0usize;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "dotted_name" => {
                    recognized += 1;
                    let module = node_text(child, src);
                    // `import a.b` binds the root segment `a`
                    let root = module.split('.').next().unwrap_or(module);
                    if root.is_empty() || root == "_" {
                        continue;
                    }
                    bindings.push(
                        Binding::new(
                            root,
                            BindingKind::ModuleImport,
                            Location::of_node(&child),
                            scope,
                        )
                        .with_module(module),
                    );
                }
                "aliased_import" => {
                    recognized += 1;
                    let (name_node, alias_node) = aliased_parts(child).ok_or_else(|| {
                        ParseShapeError::new(
                            "import statement",
                            Location::of_node(&node),
                            "aliased import is missing its name or alias",
                        )
                    })?;
                    let module = node_text(name_node, src);
                    let alias = node_text(alias_node, src);
                    if alias.is_empty() || alias == "_" {
                        continue;
                    }
                    bindings.push(
                        Binding::new(
                            alias,
                            BindingKind::AliasedImport,
                            Location::of_node(&alias_node),
                            scope,
                        )
                        .with_alias_of(module)
                        .with_module(module),
                    );
                }
                _ => {}
            }
        }

        if recognized == 0 {
            return Err(ParseShapeError::new(
                "import statement",
                Location::of_node(&node),
                "no importable names found",
            ));
        }
        Ok(bindings)
    }

    /// `from m import a, b as c`, relative forms, parenthesized lists
    fn from_import_statement(
        &self,
        node: Node,
        scope: ScopeId,
        src: &[u8],
    ) -> Result<Vec<Binding>, ParseShapeError> {
        let module = match node.child_by_field_name("module_name") {
            Some(m) if m.kind() == "dotted_name" || m.kind() == "relative_import" => {
                node_text(m, src).to_string()
            }
            _ => {
                return Err(ParseShapeError::new(
                    "from-import statement",
                    Location::of_node(&node),
                    "unrecognized module reference",
                ))
            }
        };

        {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "wildcard_import" {
                    return Err(ParseShapeError::new(
                        "from-import statement",
                        Location::of_node(&node),
                        format!(
                            "wildcard import from '{}' makes usage analysis undecidable",
                            module
                        ),
                    ));
                }
            }
        }

        let mut bindings = Vec::new();
        let mut recognized = 0usize;

        let mut cursor = node.walk();
        for name_child in node.children_by_field_name("name", &mut cursor) {
            match name_child.kind() {
                "dotted_name" => {
                    recognized += 1;
                    let name = node_text(name_child, src);
                    if name.is_empty() || name == "_" {
                        continue;
                    }
                    bindings.push(
                        Binding::new(
                            name,
                            BindingKind::FromImport,
                            Location::of_node(&name_child),
                            scope,
                        )
                        .with_module(module.clone()),
                    );
                }
                "aliased_import" => {
                    recognized += 1;
                    let (name_node, alias_node) = aliased_parts(name_child).ok_or_else(|| {
                        ParseShapeError::new(
                            "from-import statement",
                            Location::of_node(&node),
                            "aliased import is missing its name or alias",
                        )
                    })?;
                    let original = node_text(name_node, src);
                    let alias = node_text(alias_node, src);
                    if alias.is_empty() || alias == "_" {
                        continue;
                    }
                    bindings.push(
                        Binding::new(
                            alias,
                            BindingKind::AliasedImport,
                            Location::of_node(&alias_node),
                            scope,
                        )
                        .with_alias_of(original)
                        .with_module(module.clone()),
                    );
                }
                _ => {}
            }
        }

        if recognized == 0 {
            return Err(ParseShapeError::new(
                "from-import statement",
                Location::of_node(&node),
                "no importable names found",
            ));
        }
        Ok(bindings)
    }
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn node_text<'a>(node: Node<'a>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

fn aliased_parts(node: Node) -> Option<(Node, Node)> {
    let name = node.child_by_field_name("name")?;
    let alias = node.child_by_field_name("alias")?;
    Some((name, alias))
}

fn first_identifier_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor)
        .find(|c| c.kind() == "identifier");
    found
}
