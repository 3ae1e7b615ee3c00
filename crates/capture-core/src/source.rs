//! Host input surface for one analysis pass.
//!
//! The core never parses source text. The upstream parser/binder hands over
//! the raw text, a token/comment stream, and one `FunctionNode` per
//! function-like construct; everything here is a read-only input during
//! analysis. Spans are byte offsets into the unit's source text.

use swc_common::{BytePos, Span};

/// Test if one source range is fully contained in another.
pub fn span_contains(outer: Span, inner: Span) -> bool {
    outer.lo <= inner.lo && inner.hi <= outer.hi
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// A comment the upstream parser attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub span: Span,
}

impl Comment {
    pub fn new(kind: CommentKind, text: &str, span: Span) -> Self {
        Self {
            kind,
            text: text.to_string(),
            span,
        }
    }

    pub fn line(text: &str, span: Span) -> Self {
        Self::new(CommentKind::Line, text, span)
    }

    pub fn block(text: &str, span: Span) -> Self {
        Self::new(CommentKind::Block, text, span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTokenKind {
    Token,
    Comment(CommentKind),
}

/// One entry of the raw token/comment stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceToken {
    pub kind: SourceTokenKind,
    pub text: String,
    pub span: Span,
}

impl SourceToken {
    pub fn token(text: &str, span: Span) -> Self {
        Self {
            kind: SourceTokenKind::Token,
            text: text.to_string(),
            span,
        }
    }

    pub fn line_comment(text: &str, span: Span) -> Self {
        Self {
            kind: SourceTokenKind::Comment(CommentKind::Line),
            text: text.to_string(),
            span,
        }
    }

    pub fn block_comment(text: &str, span: Span) -> Self {
        Self {
            kind: SourceTokenKind::Comment(CommentKind::Block),
            text: text.to_string(),
            span,
        }
    }

    pub fn is_line_comment(&self) -> bool {
        matches!(self.kind, SourceTokenKind::Comment(CommentKind::Line))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
    Method,
}

/// A function-like construct handed over by the host, one callback at a time.
#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub kind: FunctionKind,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

impl FunctionNode {
    pub fn new(kind: FunctionKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_comments: Vec::new(),
        }
    }

    pub fn with_leading_comment(mut self, comment: Comment) -> Self {
        self.leading_comments.push(comment);
        self
    }
}

/// One program unit: raw source text plus its token/comment stream.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    source: String,
    tokens: Vec<SourceToken>,
}

impl SourceUnit {
    pub fn new(source: &str, mut tokens: Vec<SourceToken>) -> Self {
        // The backward scan in the annotation resolver relies on stream order.
        tokens.sort_by_key(|t| t.span.lo);
        Self {
            source: source.to_string(),
            tokens,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[SourceToken] {
        &self.tokens
    }

    /// 1-based line number of a byte position.
    pub fn line_of(&self, pos: BytePos) -> usize {
        let offset = (pos.0 as usize).min(self.source.len());
        self.source[..offset].matches('\n').count() + 1
    }

    /// Stream entries ending at or before `pos`, nearest first.
    pub fn tokens_before(&self, pos: BytePos) -> impl Iterator<Item = &SourceToken> {
        self.tokens.iter().rev().filter(move |t| t.span.hi <= pos)
    }
}
