//! Arena-backed scope graph supplied by the upstream binder.
//!
//! Scopes form a finite rooted tree. Parent links are non-owning back-links
//! used only for traversal; every entity is addressed by an opaque arena id.
//! The graph is read-only input during analysis — the core never mutates it.

use id_arena::{Arena, Id};
use swc_common::Span;

pub type ScopeId = Id<Scope>;
pub type VariableId = Id<Variable>;
pub type DefinitionId = Id<Definition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    ArrowFunction,
    Block,
    For,
    While,
    Switch,
    Try,
    Catch,
    Class,
}

impl ScopeKind {
    pub fn is_function_like(&self) -> bool {
        matches!(self, ScopeKind::Function | ScopeKind::ArrowFunction)
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
    pub variables: Vec<VariableId>,
    pub references: Vec<Reference>,
}

/// A named binding owned by the scope that declares it.
#[derive(Debug)]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub scope: ScopeId,
    pub definitions: Vec<DefinitionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Import,
    TypeAlias,
    Enum,
}

impl DefinitionKind {
    /// Type-level declarations never constitute a runtime capture.
    pub fn is_type_only(&self) -> bool {
        matches!(self, DefinitionKind::TypeAlias)
    }
}

/// One declaration occurrence of a variable.
#[derive(Debug)]
pub struct Definition {
    pub id: DefinitionId,
    pub variable: VariableId,
    pub kind: DefinitionKind,
    pub span: Span,
}

/// One identifier occurrence reading or writing a variable. `resolved` is
/// `None` for global or undeclared names, which are never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub span: Span,
    pub resolved: Option<VariableId>,
}

pub struct ScopeGraph {
    scopes: Arena<Scope>,
    variables: Arena<Variable>,
    definitions: Arena<Definition>,
    root: Option<ScopeId>,
}

impl Default for ScopeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeGraph {
    pub fn new() -> Self {
        Self {
            scopes: Arena::new(),
            variables: Arena::new(),
            definitions: Arena::new(),
            root: None,
        }
    }

    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId {
        let id = self.scopes.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
            variables: Vec::new(),
            references: Vec::new(),
        });

        if let Some(parent_id) = parent {
            self.scopes[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        id
    }

    pub fn declare_variable(&mut self, scope: ScopeId, name: &str) -> VariableId {
        let id = self.variables.alloc_with_id(|id| Variable {
            id,
            name: name.to_string(),
            scope,
            definitions: Vec::new(),
        });

        self.scopes[scope].variables.push(id);

        id
    }

    pub fn add_definition(
        &mut self,
        variable: VariableId,
        kind: DefinitionKind,
        span: Span,
    ) -> DefinitionId {
        let id = self.definitions.alloc_with_id(|id| Definition {
            id,
            variable,
            kind,
            span,
        });

        self.variables[variable].definitions.push(id);

        id
    }

    pub fn add_reference(&mut self, scope: ScopeId, span: Span, resolved: Option<VariableId>) {
        self.scopes[scope].references.push(Reference { span, resolved });
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id]
    }

    pub fn definition(&self, id: DefinitionId) -> &Definition {
        &self.definitions[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes[id].parent.map(|p| &self.scopes[p])
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.scopes[id].children.iter().map(|&c| &self.scopes[c])
    }

    /// Locate the function-like scope the binder created for a function node,
    /// by exact span match. `None` means the node has no scope in the graph.
    pub fn acquire(&self, span: Span) -> Option<ScopeId> {
        self.scopes
            .iter()
            .find(|(_, s)| s.kind.is_function_like() && s.span == span)
            .map(|(id, _)| id)
    }

    /// Every reference in the subtree rooted at `root`, each descendant scope
    /// visited exactly once. No scope outside the subtree is visited.
    pub fn references_under(&self, root: ScopeId) -> SubtreeReferences<'_> {
        SubtreeReferences {
            graph: self,
            stack: vec![root],
            current: &[],
            index: 0,
        }
    }
}

pub struct SubtreeReferences<'a> {
    graph: &'a ScopeGraph,
    stack: Vec<ScopeId>,
    current: &'a [Reference],
    index: usize,
}

impl<'a> Iterator for SubtreeReferences<'a> {
    type Item = &'a Reference;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index < self.current.len() {
                self.index += 1;
                return Some(&self.current[self.index - 1]);
            }

            let scope_id = self.stack.pop()?;
            let scope = &self.graph.scopes[scope_id];
            self.stack.extend(scope.children.iter().copied());
            self.current = &scope.references;
            self.index = 0;
        }
    }
}
