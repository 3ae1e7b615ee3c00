//! Core implicit-capture analysis engine.
//!
//! Detects outer-scope variables that functions tagged with an
//! `eslint-capture` comment read or write without declaring them on the tag's
//! allow-list. The scope graph (scopes, variables, definitions, resolved
//! references) is supplied pre-built by an upstream parser/binder; this crate
//! only recognizes the annotation grammar, walks the tagged function's scope
//! subtree, classifies captures, and aggregates deduplicated reports.
//!
//! Presentation of the reports, rule registration, and command-line handling
//! belong to the host.

pub mod analysis;
pub mod annotation;
pub mod config;
pub mod graph;
pub mod report;
pub mod source;

pub use analysis::CapturePass;
pub use annotation::{AllowList, CAPTURE_TAG, parse_tag, resolve_tag};
pub use config::{
    CONFIG_FILENAME, CaptureConfig, ConfigError, ReportToggle, find_config_file, load_config,
    load_config_or_default,
};
pub use graph::{
    Definition, DefinitionId, DefinitionKind, Reference, Scope, ScopeGraph, ScopeId, ScopeKind,
    SubtreeReferences, Variable, VariableId,
};
pub use report::{CaptureReport, ReportKind, ReportSink, summarize_variables};
pub use source::{
    Comment, CommentKind, FunctionKind, FunctionNode, SourceToken, SourceTokenKind, SourceUnit,
    span_contains,
};
