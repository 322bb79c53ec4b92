//! Usage resolver - matches references to bindings
//!
//! Applies lexical scoping with nearest-enclosing-declaration shadowing:
//! a reference resolves within the innermost scope on its chain that
//! declares the name, and among same-scope declarations the most recent
//! one at or before the reference wins. Earlier shadowed declarations are
//! classified independently and may be unused even though the name itself
//! is used later.

use super::{AnalysisError, AnalyzerOptions, Classification, Severity, UsageStatus};
use crate::scope::ScopeId;
use crate::symbols::{Binding, Location, Reference, SymbolTable};
use std::collections::HashMap;
use tracing::debug;

/// Resolver turning a symbol table plus references into classifications
pub struct UsageResolver {
    options: AnalyzerOptions,
}

impl UsageResolver {
    pub fn new() -> Self {
        Self {
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    /// Classify every binding as used or unused
    ///
    /// Fails only when a reference claims a scope missing from the scope
    /// table, which signals an upstream contract violation.
    pub fn resolve(
        &self,
        table: &SymbolTable,
        references: &[Reference],
    ) -> Result<Vec<Classification>, AnalysisError> {
        // binding indices per name, in declaration order
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, binding) in table.bindings.iter().enumerate() {
            by_name.entry(binding.name.as_str()).or_default().push(index);
        }

        let mut evidence: Vec<Option<Location>> = vec![None; table.bindings.len()];

        for reference in references {
            if !table.scopes.contains(reference.scope) {
                return Err(AnalysisError::Resolution {
                    name: reference.name.clone(),
                    location: reference.location,
                    scope: reference.scope.0,
                });
            }

            if reference.is_guarded() && !self.options.tolerate_guarded_references {
                continue;
            }

            let Some(candidates) = by_name.get(reference.name.as_str()) else {
                continue;
            };

            if let Some(index) = self.resolve_reference(table, reference, candidates) {
                if evidence[index].is_none() {
                    evidence[index] = Some(reference.location);
                }
            }
        }

        let classifications: Vec<Classification> = table
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, binding)| self.is_reported(binding))
            .map(|(index, binding)| {
                let status = if evidence[index].is_some() {
                    UsageStatus::Used
                } else {
                    UsageStatus::Unused
                };
                Classification {
                    name: binding.name.clone(),
                    kind: binding.kind,
                    location: binding.origin,
                    module: binding.module.clone(),
                    alias_of: binding.alias_of.clone(),
                    status,
                    severity: Severity::for_kind(binding.kind),
                    evidence: evidence[index],
                }
            })
            .collect();

        debug!(
            bindings = classifications.len(),
            unused = classifications.iter().filter(|c| c.is_unused()).count(),
            "usage resolved"
        );
        Ok(classifications)
    }

    /// Find the binding a single reference resolves to
    ///
    /// Walks the scope chain outward; the innermost scope declaring the
    /// name wins, then the positional tie-break picks among same-scope
    /// declarations.
    fn resolve_reference(
        &self,
        table: &SymbolTable,
        reference: &Reference,
        candidates: &[usize],
    ) -> Option<usize> {
        for scope in table.scopes.chain(reference.scope) {
            let in_scope: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| table.bindings[i].scope == scope)
                .collect();
            if in_scope.is_empty() {
                continue;
            }
            return Some(self.pick_declaration(table, reference, scope, &in_scope));
        }
        None
    }

    /// Positional tie-break among same-name declarations of one scope
    fn pick_declaration(
        &self,
        table: &SymbolTable,
        reference: &Reference,
        scope: ScopeId,
        in_scope: &[usize],
    ) -> usize {
        if reference.scope == scope {
            // same scope: latest declaration at or before the reference;
            // a reference ahead of every declaration falls forward to the
            // earliest one
            in_scope
                .iter()
                .copied()
                .filter(|&i| table.bindings[i].origin <= reference.location)
                .last()
                .unwrap_or(in_scope[0])
        } else {
            // nested scope: the enclosing scope has finished rebinding by
            // the time the nested body runs, so the final declaration wins
            in_scope[in_scope.len() - 1]
        }
    }

    fn is_reported(&self, binding: &Binding) -> bool {
        use crate::symbols::BindingKind::*;
        match binding.kind {
            ModuleImport | FromImport | AliasedImport => true,
            FunctionDef | ClassDef | Variable => self.options.report_local_definitions,
            Parameter => self.options.report_parameters,
        }
    }
}

impl Default for UsageResolver {
    fn default() -> Self {
        Self::new()
    }
}
