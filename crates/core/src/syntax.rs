//! Lightweight token scanner over raw source text
//!
//! This is not a grammar: it classifies just enough (keywords, identifiers,
//! attributes, literals, comments, punctuation) for the secondary scans that
//! the structure tree does not cover, such as `typealias` declarations.

use crate::structure::ByteRange;
use regex::Regex;
use std::sync::OnceLock;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Keyword,
    Identifier,
    /// `@name`
    Attribute,
    Number,
    String,
    Comment,
    Punctuation,
}

/// A classified token with its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxToken {
    pub kind: SyntaxKind,
    pub range: ByteRange,
}

impl SyntaxToken {
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        self.range.slice(source).unwrap_or_default()
    }

    pub fn is(&self, source: &str, kind: SyntaxKind, text: &str) -> bool {
        self.kind == kind && self.text(source) == text
    }
}

const KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "rethrows", "static", "struct", "subscript", "typealias", "var", "break", "case", "continue",
    "default", "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat",
    "return", "switch", "where", "while", "as", "Any", "catch", "false", "is", "nil", "self",
    "Self", "super", "throw", "throws", "true", "try", "async", "await", "some", "any",
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<comment>//[^\n]*|/\*(?s:.*?)\*/)",
            r#"|(?P<string>"""(?s:.*?)"""|"(?:\\.|[^"\\\n])*")"#,
            r"|(?P<attribute>@[A-Za-z_][A-Za-z0-9_]*)",
            r"|(?P<number>\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)",
            r"|(?P<ident>`[A-Za-z_][A-Za-z0-9_]*`|[A-Za-z_][A-Za-z0-9_]*|\$\d+)",
            r"|(?P<punct>->|\.\.\.|[^\sA-Za-z0-9_])",
        ))
        .expect("token pattern is a valid regex")
    })
}

/// Split `source` into classified tokens in document order.
/// Whitespace is dropped; comments are kept as `SyntaxKind::Comment`.
pub fn tokenize(source: &str) -> Vec<SyntaxToken> {
    token_pattern()
        .captures_iter(source)
        .filter_map(|caps| {
            let (kind, m) = if let Some(m) = caps.name("comment") {
                (SyntaxKind::Comment, m)
            } else if let Some(m) = caps.name("string") {
                (SyntaxKind::String, m)
            } else if let Some(m) = caps.name("attribute") {
                (SyntaxKind::Attribute, m)
            } else if let Some(m) = caps.name("number") {
                (SyntaxKind::Number, m)
            } else if let Some(m) = caps.name("ident") {
                let kind = if KEYWORDS.contains(&m.as_str()) {
                    SyntaxKind::Keyword
                } else {
                    SyntaxKind::Identifier
                };
                (kind, m)
            } else {
                (SyntaxKind::Punctuation, caps.name("punct")?)
            };
            Some(SyntaxToken {
                kind,
                range: ByteRange::new(m.start(), m.len()),
            })
        })
        .collect()
}
