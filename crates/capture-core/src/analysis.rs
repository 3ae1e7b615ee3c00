//! The capture analysis pass.
//!
//! The host hands over one function-like node at a time. Tagged nodes have
//! the subtree under their scope walked; every reference to a variable with a
//! non-type definition outside the function's range (and not on the tag's
//! allow-list) is an implicit capture. Reference reports are emitted as
//! found; function and declaration reports flush once at pass end.
//!
//! Each pass owns fresh state, so multiple units can be analyzed without any
//! shared mutable state; the scope graph is never mutated.

use swc_common::Span;
use tracing::{debug, trace};

use crate::annotation::{AllowList, resolve_tag};
use crate::config::CaptureConfig;
use crate::graph::{DefinitionId, Reference, ScopeGraph, VariableId};
use crate::report::{CaptureReport, ReportSink};
use crate::source::{FunctionNode, SourceUnit, span_contains};

/// One classified capture: a reference whose variable has at least one
/// kept (outer, non-type) definition.
struct Capture {
    variable: VariableId,
    definitions: Vec<DefinitionId>,
}

/// Decide whether a reference captures an outer variable.
///
/// A variable redeclared both inside and outside the function is a capture
/// through its outer definitions only; the shadowing inner definition does
/// not suppress them.
fn classify_reference(
    graph: &ScopeGraph,
    reference: &Reference,
    func_span: Span,
    allow: &AllowList,
) -> Option<Capture> {
    // Unresolved names (globals, undeclared) cannot close over anything.
    let variable_id = reference.resolved?;
    let variable = graph.variable(variable_id);

    // Allow-list exemption is by spelling, not identity.
    if allow.contains(&variable.name) {
        return None;
    }

    let definitions: Vec<DefinitionId> = variable
        .definitions
        .iter()
        .copied()
        .filter(|&id| {
            let definition = graph.definition(id);
            !span_contains(func_span, definition.span) && !definition.kind.is_type_only()
        })
        .collect();

    // Entirely self-declared, or only type-level outer declarations.
    if definitions.is_empty() {
        return None;
    }

    Some(Capture {
        variable: variable_id,
        definitions,
    })
}

/// One analysis pass over one program unit.
pub struct CapturePass<'a> {
    graph: &'a ScopeGraph,
    unit: &'a SourceUnit,
    sink: ReportSink,
}

impl<'a> CapturePass<'a> {
    pub fn new(graph: &'a ScopeGraph, unit: &'a SourceUnit, config: CaptureConfig) -> Self {
        Self {
            graph,
            unit,
            sink: ReportSink::new(config),
        }
    }

    /// Analyze every function-like node of a unit and flush.
    pub fn run(
        graph: &ScopeGraph,
        unit: &SourceUnit,
        config: CaptureConfig,
        functions: &[FunctionNode],
    ) -> Vec<CaptureReport> {
        let mut pass = CapturePass::new(graph, unit, config);
        for func in functions {
            pass.check_function(func);
        }
        pass.finish()
    }

    /// Host callback for one function-like node. Untagged nodes are excluded
    /// entirely; a tagged node without a scope degrades to a single `noScope`
    /// report and is skipped, never failing the pass.
    pub fn check_function(&mut self, func: &FunctionNode) {
        let Some(allow) = resolve_tag(func, self.unit) else {
            return;
        };

        let graph = self.graph;
        let Some(scope) = graph.acquire(func.span) else {
            debug!(span = ?func.span, "tagged function has no scope");
            self.sink.no_scope(func.span);
            return;
        };

        debug!(span = ?func.span, allowed = ?allow.names(), "analyzing tagged function");

        // Distinct captured variables, in first-capture order.
        let mut closed: Vec<VariableId> = Vec::new();

        for reference in graph.references_under(scope) {
            let Some(capture) = classify_reference(graph, reference, func.span, &allow) else {
                continue;
            };
            let variable = graph.variable(capture.variable);
            trace!(variable = %variable.name, span = ?reference.span, "implicit capture");

            self.sink.reference(reference.span, &variable.name);

            if !closed.contains(&capture.variable) {
                closed.push(capture.variable);
            }

            for id in capture.definitions {
                let definition = graph.definition(id);
                self.sink.declaration(id, definition.span, &variable.name);
            }
        }

        let names = closed
            .iter()
            .map(|&id| graph.variable(id).name.clone())
            .collect();
        self.sink.function_captures(func.span, names);
    }

    /// Flush the buffered function and declaration reports and hand back
    /// everything accumulated by this pass.
    pub fn finish(self) -> Vec<CaptureReport> {
        self.sink.finish()
    }
}
