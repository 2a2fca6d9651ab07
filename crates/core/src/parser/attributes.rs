//! Attribute extraction from the raw text in front of a declaration

use crate::model::{Attribute, AttributeArgument, Attributes};
use crate::structure::Structure;
use crate::text::{split_first_top_level, split_top_level};
use std::collections::BTreeMap;

/// Attributes of a declaration node.
///
/// The service only reports which attributes apply, not where they are
/// written. The right-most occurrence of each reported name in the text
/// before the declaration is located, and everything from just before the
/// earliest of those locations is parsed as attribute text.
pub fn parse_declaration_attributes(node: &Structure, contents: &str) -> Attributes {
    let identifiers = node.attribute_names();
    if identifiers.is_empty() {
        return Attributes::new();
    }
    let Some(prefix) = node.offset.and_then(|offset| contents.get(..offset)) else {
        return Attributes::new();
    };

    let Some(location) = identifiers
        .iter()
        .filter_map(|identifier| prefix.rfind(identifier.as_str()))
        .min()
    else {
        return Attributes::new();
    };

    // one character back picks up the `@`
    let start = prefix[..location]
        .char_indices()
        .next_back()
        .map(|(index, _)| index)
        .unwrap_or(0);

    parse_attributes_with_modifiers(&prefix[start..], &identifiers)
}

/// Parse attribute text such as `@objc(name) @available(iOS 10, *)`
pub fn parse_attributes(text: &str) -> Attributes {
    parse_attributes_with_modifiers(text, &[])
}

/// Like [`parse_attributes`]; bare words that follow an attribute and are
/// listed in `modifiers` (e.g. `final` after `@objc`) become attributes too.
fn parse_attributes_with_modifiers(text: &str, modifiers: &[String]) -> Attributes {
    let mut attributes = Attributes::new();

    for (index, chunk) in split_top_level(text, '@').into_iter().enumerate() {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let has_at = index > 0;

        let name_len = chunk
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(chunk.len());
        let name = &chunk[..name_len];
        if name.is_empty() {
            continue;
        }

        let after_name = &chunk[name_len..];
        let (arguments, consumed) = match after_name.strip_prefix('(') {
            Some(inner) => match closing_paren(inner) {
                Some(close) => (parse_arguments(&inner[..close]), close + 2),
                None => (BTreeMap::new(), 0),
            },
            None => (BTreeMap::new(), 0),
        };

        let written = &chunk[..name_len + consumed];
        let description = if has_at {
            format!("@{}", written)
        } else {
            written.to_string()
        };
        attributes.insert(
            name.to_string(),
            Attribute {
                name: name.to_string(),
                arguments,
                description,
            },
        );

        for word in chunk[name_len + consumed..].split_whitespace() {
            if modifiers.iter().any(|m| m == word) {
                attributes.insert(
                    word.to_string(),
                    Attribute {
                        name: word.to_string(),
                        arguments: BTreeMap::new(),
                        description: word.to_string(),
                    },
                );
            }
        }
    }

    attributes
}

/// Index of the `)` closing an already-opened parenthesis
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    for (index, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_arguments(text: &str) -> BTreeMap<String, AttributeArgument> {
    let mut arguments = BTreeMap::new();
    for argument in split_top_level(text, ',') {
        let argument = argument.trim();
        if argument.is_empty() {
            continue;
        }
        if !argument.contains('"') {
            if argument != "*" {
                arguments.insert(argument.replace(' ', "_"), AttributeArgument::Flag(true));
            }
            continue;
        }
        if let Some((name, value)) = split_first_top_level(argument, ':') {
            arguments.insert(
                name.trim().to_string(),
                AttributeArgument::Text(value.replace('"', "").trim().to_string()),
            );
        }
    }
    arguments
}
