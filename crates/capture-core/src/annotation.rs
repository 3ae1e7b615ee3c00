//! Capture annotation recognition.
//!
//! A function opts into capture analysis with a comment on the line
//! immediately preceding it (or attached as its leading comment):
//!
//! - `// eslint-capture` — track captures, nothing pre-approved
//! - `// eslint-capture (x, y)` — track captures, `x` and `y` pre-approved
//!
//! The keyword and grammar stay bit-compatible with the eslint-plugin-capture
//! annotation format, so sources already tagged for it keep working. Comment
//! text is the comment body without the `//` or `/* */` markers.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::{FunctionNode, SourceUnit};

pub const CAPTURE_TAG: &str = "eslint-capture";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*eslint-capture(\s*\((.*)\))?").expect("Invalid regex pattern")
});

/// Variable names a tag pre-approves as intentionally captured. Names are not
/// validated against any scope; an unknown name simply never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: Vec<String>,
}

impl AllowList {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse one comment body against the tag grammar.
pub fn parse_tag(comment: &str) -> Option<AllowList> {
    let captures = TAG_RE.captures(comment)?;

    let Some(list) = captures.get(2) else {
        return Some(AllowList::default());
    };
    if list.as_str().is_empty() {
        return Some(AllowList::default());
    }

    let names = list
        .as_str()
        .split(',')
        .map(|name| name.trim().to_string())
        .collect();

    Some(AllowList { names })
}

/// Decide whether a function-like node is tagged, returning its allow-list.
///
/// Parser-attached leading comments are inspected first; only the first
/// matching comment in the search is honored. If none match, the raw
/// token/comment stream is scanned backward from the node — comment
/// attachment is unreliable for arrow expressions and object-literal methods.
/// The scan stops at the first line comment or at anything ending more than
/// one line above the node; a stop entry counts only if it is a line comment
/// ending on the line immediately above.
pub fn resolve_tag(func: &FunctionNode, unit: &SourceUnit) -> Option<AllowList> {
    for comment in &func.leading_comments {
        if let Some(allow) = parse_tag(&comment.text) {
            return Some(allow);
        }
    }

    let node_line = unit.line_of(func.span.lo);

    let stop = unit.tokens_before(func.span.lo).find(|token| {
        token.is_line_comment() || unit.line_of(token.span.hi) + 1 < node_line
    })?;

    if stop.is_line_comment() && unit.line_of(stop.span.hi) + 1 == node_line {
        return parse_tag(&stop.text);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Comment, FunctionKind, SourceToken};
    use swc_common::{BytePos, Span};

    fn sp(lo: u32, hi: u32) -> Span {
        Span::new(BytePos(lo), BytePos(hi))
    }

    /// Span of the nth occurrence of `needle` in `code`.
    fn span_of(code: &str, needle: &str, nth: usize) -> Span {
        let mut from = 0;
        for _ in 0..nth {
            from = code[from..].find(needle).expect("needle not found") + from + needle.len();
        }
        let lo = code[from..].find(needle).expect("needle not found") + from;
        sp(lo as u32, (lo + needle.len()) as u32)
    }

    #[test]
    fn parses_bare_tag() {
        let allow = parse_tag(" eslint-capture").expect("tag should match");

        assert!(allow.is_empty());
    }

    #[test]
    fn parses_tag_with_names() {
        let allow = parse_tag(" eslint-capture (x, y)").expect("tag should match");

        assert_eq!(allow.names(), ["x", "y"]);
        assert!(allow.contains("x"));
        assert!(allow.contains("y"));
        assert!(!allow.contains("z"));
    }

    #[test]
    fn parses_tag_with_irregular_whitespace() {
        let allow = parse_tag("   eslint-capture(  a ,b,  c  )").expect("tag should match");

        assert_eq!(allow.names(), ["a", "b", "c"]);
    }

    #[test]
    fn empty_parens_yield_empty_allow_list() {
        let allow = parse_tag(" eslint-capture ()").expect("tag should match");

        assert!(allow.is_empty());
    }

    #[test]
    fn unrelated_comment_does_not_match() {
        assert!(parse_tag(" some ordinary comment").is_none());
        assert!(parse_tag(" capture this please").is_none());
        assert!(parse_tag("").is_none());
    }

    #[test]
    fn tag_must_start_the_comment() {
        assert!(parse_tag(" see eslint-capture docs").is_none());
    }

    #[test]
    fn attached_comment_wins() {
        let code = "// eslint-capture (a)\nconst f = () => a;";
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0))
            .with_leading_comment(Comment::line(" eslint-capture (a)", sp(0, 21)));
        let unit = SourceUnit::new(code, Vec::new());

        let allow = resolve_tag(&func, &unit).expect("should be tagged");
        assert_eq!(allow.names(), ["a"]);
    }

    #[test]
    fn attached_block_comment_is_recognized() {
        let code = "/* eslint-capture */ const f = () => a;";
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0))
            .with_leading_comment(Comment::block(" eslint-capture ", sp(0, 20)));
        let unit = SourceUnit::new(code, Vec::new());

        assert!(resolve_tag(&func, &unit).is_some());
    }

    #[test]
    fn first_matching_attached_comment_is_honored() {
        let func = FunctionNode::new(FunctionKind::Declaration, sp(50, 80))
            .with_leading_comment(Comment::line(" eslint-capture (first)", sp(0, 23)))
            .with_leading_comment(Comment::line(" eslint-capture (second)", sp(24, 48)));
        let unit = SourceUnit::new("", Vec::new());

        let allow = resolve_tag(&func, &unit).expect("should be tagged");
        assert_eq!(allow.names(), ["first"]);
    }

    #[test]
    fn fallback_finds_line_comment_directly_above() {
        let code = "// eslint-capture\nconst f = () => a;";
        let comment_span = span_of(code, "// eslint-capture", 0);
        let unit = SourceUnit::new(
            code,
            vec![SourceToken::line_comment(" eslint-capture", comment_span)],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        let allow = resolve_tag(&func, &unit).expect("should be tagged");
        assert!(allow.is_empty());
    }

    #[test]
    fn fallback_skips_tokens_on_intervening_positions() {
        // Tokens of the same statement sit between the comment and the arrow
        // expression's own start; they must not end the scan.
        let code = "// eslint-capture (x)\nconst f = () => x;";
        let comment_span = span_of(code, "// eslint-capture (x)", 0);
        let unit = SourceUnit::new(
            code,
            vec![
                SourceToken::line_comment(" eslint-capture (x)", comment_span),
                SourceToken::token("const", span_of(code, "const", 0)),
                SourceToken::token("f", span_of(code, "f", 0)),
                SourceToken::token("=", span_of(code, "= ", 0)),
            ],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => x", 0));

        let allow = resolve_tag(&func, &unit).expect("should be tagged");
        assert_eq!(allow.names(), ["x"]);
    }

    #[test]
    fn fallback_rejects_comment_two_lines_above() {
        let code = "// eslint-capture\n\nconst f = () => a;";
        let comment_span = span_of(code, "// eslint-capture", 0);
        let unit = SourceUnit::new(
            code,
            vec![SourceToken::line_comment(" eslint-capture", comment_span)],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        assert!(resolve_tag(&func, &unit).is_none());
    }

    #[test]
    fn fallback_stops_at_nearest_line_comment() {
        // The nearest line comment is unrelated; the real tag above it is
        // never re-examined.
        let code = "// eslint-capture\n// just a note\nconst f = () => a;";
        let tag_span = span_of(code, "// eslint-capture", 0);
        let note_span = span_of(code, "// just a note", 0);
        let unit = SourceUnit::new(
            code,
            vec![
                SourceToken::line_comment(" eslint-capture", tag_span),
                SourceToken::line_comment(" just a note", note_span),
            ],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        assert!(resolve_tag(&func, &unit).is_none());
    }

    #[test]
    fn fallback_stops_at_code_ending_two_lines_above() {
        let code = "const a = 1;\n\nconst f = () => a;";
        let unit = SourceUnit::new(
            code,
            vec![SourceToken::token(";", span_of(code, ";", 0))],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        assert!(resolve_tag(&func, &unit).is_none());
    }

    #[test]
    fn untagged_function_resolves_to_none() {
        let code = "const f = () => a;";
        let unit = SourceUnit::new(code, Vec::new());
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        assert!(resolve_tag(&func, &unit).is_none());
    }

    #[test]
    fn block_comment_does_not_satisfy_the_fallback() {
        let code = "/* eslint-capture */\nconst f = () => a;";
        let comment_span = span_of(code, "/* eslint-capture */", 0);
        let unit = SourceUnit::new(
            code,
            vec![SourceToken::block_comment(" eslint-capture ", comment_span)],
        );
        let func = FunctionNode::new(FunctionKind::Arrow, span_of(code, "() => a", 0));

        assert!(resolve_tag(&func, &unit).is_none());
    }
}
