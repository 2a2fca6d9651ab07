//! Fixture helpers: build structure nodes whose byte ranges point into an
//! inline source string, the way the analysis service would report them.

#![allow(dead_code)]

use declgraph_core::{FileParser, ParsedFile, ParserConfig, SourceUnit, Structure};

/// `(offset, length)` of the first occurrence of `text`
pub fn exact(source: &str, text: &str) -> (usize, usize) {
    exact_after(source, text, 0)
}

/// `(offset, length)` of the first occurrence of `text` at or after `from`
pub fn exact_after(source: &str, text: &str, from: usize) -> (usize, usize) {
    let offset = source[from..]
        .find(text)
        .unwrap_or_else(|| panic!("`{}` not found in fixture", text))
        + from;
    (offset, text.len())
}

/// `(offset, length)` from the first `start` through the next `end`, inclusive
pub fn span(source: &str, start: &str, end: &str) -> (usize, usize) {
    let (offset, _) = exact(source, start);
    let (end_offset, end_len) = exact_after(source, end, offset + start.len());
    (offset, end_offset + end_len - offset)
}

/// A declaration node covering `range`, named `name`, whose name text is
/// `name_text`. A body is recorded when a `{` follows the name.
pub fn decl(
    source: &str,
    kind: &str,
    name: &str,
    (offset, length): (usize, usize),
    name_text: &str,
) -> Structure {
    let text = &source[offset..offset + length];
    let name_index = text
        .find(name_text)
        .unwrap_or_else(|| panic!("`{}` not inside `{}`", name_text, text));
    let name_end = name_index + name_text.len();

    let (body_offset, body_length) = match (text[name_end..].find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if close > name_end + open => {
            let open = name_end + open;
            (Some(offset + open + 1), Some(close - open - 1))
        }
        _ => (None, None),
    };

    Structure {
        kind: Some(format!("source.lang.swift.decl.{}", kind)),
        name: Some(name.to_string()),
        accessibility: Some("source.lang.swift.accessibility.internal".to_string()),
        offset: Some(offset),
        length: Some(length),
        name_offset: Some(offset + name_index),
        name_length: Some(name_text.len()),
        body_offset,
        body_length,
        ..Default::default()
    }
}

pub fn access(mut node: Structure, level: &str) -> Structure {
    node.accessibility = Some(format!("source.lang.swift.accessibility.{}", level));
    node
}

pub fn setter(mut node: Structure, level: &str) -> Structure {
    node.setter_accessibility = Some(format!("source.lang.swift.accessibility.{}", level));
    node
}

pub fn typed(mut node: Structure, type_name: &str) -> Structure {
    node.type_name = Some(type_name.to_string());
    node
}

pub fn inherits(mut node: Structure, names: &[&str]) -> Structure {
    node.inherited_types = names
        .iter()
        .map(|n| declgraph_core::structure::InheritedTypeEntry {
            name: Some(n.to_string()),
        })
        .collect();
    node
}

pub fn attributed(mut node: Structure, names: &[&str]) -> Structure {
    node.attributes = names
        .iter()
        .map(|n| declgraph_core::structure::AttributeEntry {
            attribute: Some(format!("source.decl.attribute.{}", n)),
        })
        .collect();
    node
}

pub fn children(mut node: Structure, substructure: Vec<Structure>) -> Structure {
    node.substructure = substructure;
    node
}

/// `enumcase` grouping node: no name, only children
pub fn case_group(substructure: Vec<Structure>) -> Structure {
    Structure {
        kind: Some("source.lang.swift.decl.enumcase".to_string()),
        substructure,
        ..Default::default()
    }
}

pub fn root(substructure: Vec<Structure>) -> Structure {
    Structure {
        substructure,
        ..Default::default()
    }
}

pub fn parse(source: &str, structure: Structure) -> ParsedFile {
    FileParser::default().parse(&SourceUnit::new(source, structure))
}

pub fn parse_verbose(source: &str, structure: Structure) -> ParsedFile {
    let config = ParserConfig {
        verbose: true,
        module: None,
    };
    FileParser::new(config).parse(&SourceUnit::new(source, structure))
}
