//! Report records and per-pass aggregation.
//!
//! Reference reports are emitted as discovered, one per capturing occurrence.
//! Function and declaration reports are buffered and flushed once at pass
//! end, in first-encountered order, functions before declarations. Each of
//! the three streams honors its own config toggle; the degraded `noScope`
//! report bypasses the toggles.

use std::collections::HashSet;

use swc_common::Span;

use crate::config::CaptureConfig;
use crate::graph::DefinitionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    NoScope,
    Reference,
    Function,
    Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureReport {
    /// A tagged function whose scope could not be located in the graph.
    NoScope { span: Span },
    /// One capturing occurrence, at the reference's own location.
    Reference { span: Span, variable: String },
    /// A tagged function with its distinct captured variable names, sorted.
    Function { span: Span, variables: Vec<String> },
    /// A definition captured by at least one tagged function.
    Declaration { span: Span, variable: String },
}

impl CaptureReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            CaptureReport::NoScope { .. } => ReportKind::NoScope,
            CaptureReport::Reference { .. } => ReportKind::Reference,
            CaptureReport::Function { .. } => ReportKind::Function,
            CaptureReport::Declaration { .. } => ReportKind::Declaration,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CaptureReport::NoScope { span }
            | CaptureReport::Reference { span, .. }
            | CaptureReport::Function { span, .. }
            | CaptureReport::Declaration { span, .. } => *span,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CaptureReport::NoScope { .. } => "tagged a function without a scope".to_string(),
            CaptureReport::Reference { variable, .. } => {
                format!("reference to variable {variable} in an `eslint-capture` function")
            }
            CaptureReport::Function { variables, .. } => {
                format!(
                    "function tagged with `eslint-capture` closes variables: {}",
                    summarize_variables(variables.iter().map(String::as_str))
                )
            }
            CaptureReport::Declaration { variable, .. } => {
                format!("declared variable {variable} referenced in an `eslint-capture` function")
            }
        }
    }
}

/// Human-readable summary of captured variable names: sorted alphabetically;
/// more than 4 names collapse to the first 2, an ellipsis, and the last 1.
pub fn summarize_variables<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = names.into_iter().collect();
    sorted.sort_unstable();

    if sorted.len() > 4 {
        let last = sorted[sorted.len() - 1];
        sorted.truncate(2);
        sorted.push("...");
        sorted.push(last);
    }

    sorted.join(", ")
}

/// Pass-local report accumulator. Created empty per analysis pass, fed during
/// traversal, read once via `finish` and then discarded.
#[derive(Debug)]
pub struct ReportSink {
    config: CaptureConfig,
    reports: Vec<CaptureReport>,
    pending_functions: Vec<(Span, Vec<String>)>,
    pending_declarations: Vec<(Span, String)>,
    seen_definitions: HashSet<DefinitionId>,
}

impl ReportSink {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            reports: Vec::new(),
            pending_functions: Vec::new(),
            pending_declarations: Vec::new(),
            seen_definitions: HashSet::new(),
        }
    }

    pub fn no_scope(&mut self, span: Span) {
        self.reports.push(CaptureReport::NoScope { span });
    }

    pub fn reference(&mut self, span: Span, variable: &str) {
        if self.config.reference.is_enabled() {
            self.reports.push(CaptureReport::Reference {
                span,
                variable: variable.to_string(),
            });
        }
    }

    /// Buffer one function report. `variables` holds the names of the
    /// function's distinct captured variables; nothing is buffered when it is
    /// empty.
    pub fn function_captures(&mut self, span: Span, variables: Vec<String>) {
        if self.config.function.is_enabled() && !variables.is_empty() {
            self.pending_functions.push((span, variables));
        }
    }

    /// Buffer one declaration report, deduplicated by definition identity —
    /// two definitions of the same name are both reported if both are
    /// captured.
    pub fn declaration(&mut self, definition: DefinitionId, span: Span, variable: &str) {
        if self.config.declaration.is_enabled() && self.seen_definitions.insert(definition) {
            self.pending_declarations.push((span, variable.to_string()));
        }
    }

    pub fn finish(mut self) -> Vec<CaptureReport> {
        for (span, mut variables) in std::mem::take(&mut self.pending_functions) {
            variables.sort_unstable();
            self.reports.push(CaptureReport::Function { span, variables });
        }

        for (span, variable) in std::mem::take(&mut self.pending_declarations) {
            self.reports.push(CaptureReport::Declaration { span, variable });
        }

        self.reports
    }
}
