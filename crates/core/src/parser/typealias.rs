//! `typealias` discovery by token scan
//!
//! The structure tree does not report typealiases, so they are found by
//! scanning tokens of the raw text. Declarations already handled by the walk
//! are blanked out first so aliases declared in nested scopes are not picked
//! up by the enclosing one.

use crate::model::{TypeName, Typealias};
use crate::structure::{ByteRange, Structure};
use crate::syntax::{tokenize, SyntaxKind, SyntaxToken};
use crate::text::brackets_balancing;

/// Keywords that may appear inside a type
const TYPE_KEYWORDS: &[&str] = &[
    "Any", "Self", "throws", "rethrows", "async", "inout", "some", "any",
];

/// Collect public-facing typealiases declared directly in `scope`.
///
/// `scope` is the body of the owning type, or `None` for the whole file.
/// `processed` are the declarations visited inside that scope.
pub fn extract_typealiases(
    contents: &str,
    scope: Option<ByteRange>,
    processed: &[&Structure],
) -> Vec<Typealias> {
    let scope = scope.unwrap_or(ByteRange::new(0, contents.len()));
    let Some(scoped) = scope.slice(contents) else {
        return Vec::new();
    };

    let mut working = scoped.to_string();
    for range in processed.iter().filter_map(|node| node.range()) {
        if !scope.contains(&range) {
            continue;
        }
        let start = range.offset - scope.offset;
        let end = start + range.length;
        if working.is_char_boundary(start) && working.is_char_boundary(end) {
            working.replace_range(start..end, &" ".repeat(range.length));
        }
    }
    // the scanner does not treat an empty tuple as a type
    let working = working.replace("()", "(Void)");

    let tokens: Vec<SyntaxToken> = tokenize(&working)
        .into_iter()
        .filter(|t| t.kind != SyntaxKind::Comment)
        .collect();

    let mut typealiases = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if !token.is(&working, SyntaxKind::Keyword, "typealias") {
            continue;
        }
        let is_hidden = index > 0
            && matches!(
                tokens[index - 1].text(&working),
                "private" | "fileprivate"
            );
        if is_hidden {
            continue;
        }
        if let Some(typealias) = read_typealias(&tokens[index + 1..], &working) {
            typealiases.push(typealias);
        }
    }
    typealiases
}

/// Read `NAME [<...>] = TYPE` following the `typealias` keyword
fn read_typealias(tokens: &[SyntaxToken], text: &str) -> Option<Typealias> {
    let name_token = tokens.first().filter(|t| t.kind == SyntaxKind::Identifier)?;
    let alias_name = name_token.text(text).trim_matches('`').to_string();

    let mut cursor = 1;
    if tokens.get(cursor)?.is(text, SyntaxKind::Punctuation, "<") {
        let mut depth = 0usize;
        while let Some(token) = tokens.get(cursor) {
            match token.text(text) {
                "<" => depth += 1,
                ">" => {
                    depth -= 1;
                    if depth == 0 {
                        cursor += 1;
                        break;
                    }
                }
                _ => {}
            }
            cursor += 1;
        }
    }
    if !tokens.get(cursor)?.is(text, SyntaxKind::Punctuation, "=") {
        return None;
    }

    let run = &tokens[cursor + 1..];
    let length = type_run_length(run, text);
    let first = run.first()?;
    let last = run.get(length.checked_sub(1)?)?;
    let type_text = ByteRange::new(first.range.offset, last.range.end()? - first.range.offset)
        .slice(text)?;

    Some(Typealias {
        alias_name,
        type_name: TypeName::new(&brackets_balancing(type_text)),
        parent_name: None,
    })
}

/// Number of leading tokens that together form one type
fn type_run_length(tokens: &[SyntaxToken], text: &str) -> usize {
    let mut depth = 0usize;
    let mut taken = 0;
    let mut previous: Option<&SyntaxToken> = None;

    for token in tokens {
        let token_text = token.text(text);

        if depth == 0 {
            if let Some(previous) = previous {
                let gap = previous
                    .range
                    .end()
                    .and_then(|end| text.get(end..token.range.offset))
                    .unwrap_or_default();
                let continues = matches!(previous.text(text), "->" | "&" | ".")
                    || matches!(token_text, "->" | "&" | ".");
                if gap.contains('\n') && !continues {
                    break;
                }
            }
        }

        let accepted = match token.kind {
            SyntaxKind::Identifier | SyntaxKind::Attribute => true,
            SyntaxKind::Keyword => TYPE_KEYWORDS.contains(&token_text),
            SyntaxKind::Punctuation => match token_text {
                "(" | "[" | "<" => {
                    depth += 1;
                    true
                }
                ")" | "]" | ">" if depth > 0 => {
                    depth -= 1;
                    true
                }
                "," | ":" => depth > 0,
                "." | "?" | "!" | "->" | "&" | "..." => true,
                _ => false,
            },
            _ => false,
        };
        if !accepted {
            break;
        }
        taken += 1;
        previous = Some(token);
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(source: &str) -> Vec<(String, String)> {
        extract_typealiases(source, None, &[])
            .into_iter()
            .map(|t| (t.alias_name, t.type_name.name))
            .collect()
    }

    #[test]
    fn test_function_and_generic_types() {
        let source = r#"
typealias Completion = (Result<Int, Error>) -> Void
typealias Lookup = [String: [Int]]
let x = 1
"#;
        assert_eq!(
            aliases(source),
            vec![
                ("Completion".to_string(), "(Result<Int, Error>) -> Void".to_string()),
                ("Lookup".to_string(), "[String: [Int]]".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_tuple_becomes_void() {
        assert_eq!(
            aliases("typealias Done = ()\ntypealias Callback = () -> ()"),
            vec![
                ("Done".to_string(), "Void".to_string()),
                ("Callback".to_string(), "(Void) -> (Void)".to_string()),
            ]
        );
    }

    #[test]
    fn test_private_aliases_are_skipped() {
        let source = "private typealias A = Int\nfileprivate typealias B = Int\npublic typealias C = Int";
        assert_eq!(aliases(source), vec![("C".to_string(), "Int".to_string())]);
    }

    #[test]
    fn test_type_stops_at_line_end() {
        let source = "typealias Name = String\nvar other: Int";
        assert_eq!(aliases(source), vec![("Name".to_string(), "String".to_string())]);
    }
}
