//! Type inference for untyped variable initializers
//!
//! Only literal shapes are understood: `nil`, strings, booleans, numbers,
//! tuples, array and dictionary literals, and constructor calls. Anything
//! else yields `None` and the caller falls back to the unknown placeholder.

use crate::model::type_name::{ANY, BOOL, DOUBLE, INT, OPTIONAL, STRING};
use crate::model::{CompositeType, TupleElement, TypeName};
use crate::text::{
    comma_separated, drop_first_and_last, is_tuple_literal, is_wrapped_by, split_first_top_level,
};
use std::collections::BTreeSet;

/// Infer the type of a literal initializer
pub fn infer_type(literal: &str) -> Option<TypeName> {
    let literal = literal.trim();
    if literal.is_empty() {
        return None;
    }
    // immediately-invoked closure, the return type is not visible
    if literal.starts_with('{') && literal.ends_with(')') {
        return None;
    }

    if literal == "nil" {
        Some(TypeName::plain(OPTIONAL))
    } else if literal.starts_with('"') {
        Some(TypeName::plain(STRING))
    } else if literal == "true" || literal == "false" {
        Some(TypeName::plain(BOOL))
    } else if literal.parse::<i64>().is_ok() {
        Some(TypeName::plain(INT))
    } else if is_float(literal) {
        Some(TypeName::plain(DOUBLE))
    } else if is_tuple_literal(literal) {
        infer_tuple(drop_first_and_last(literal))
    } else if is_wrapped_by(literal, '[', ']') {
        infer_collection(drop_first_and_last(literal))
    } else if let Some(index) = literal.find(".init(") {
        non_empty(&literal[..index])
    } else if literal.ends_with(')') && literal.contains('(') {
        let callee = literal.split('(').next().unwrap_or_default();
        // `Foo.bar(1)` is more likely an enum case with payload than a type
        if callee.contains('.') {
            return None;
        }
        non_empty(callee)
    } else {
        None
    }
}

fn is_float(literal: &str) -> bool {
    literal.bytes().any(|b| b.is_ascii_digit()) && literal.parse::<f64>().is_ok()
}

fn non_empty(name: &str) -> Option<TypeName> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(TypeName::plain(name))
    }
}

fn infer_tuple(body: &str) -> Option<TypeName> {
    let mut elements = Vec::new();
    for element in comma_separated(body) {
        let (label, value) = match split_first_top_level(element, ':') {
            Some((label, value)) => {
                let label = label.trim();
                let label = (!label.is_empty() && label != "_").then(|| label.to_string());
                (label, value)
            }
            None => (None, element),
        };
        elements.push(TupleElement {
            name: label,
            type_name: infer_type(value)?,
        });
    }

    let name = elements
        .iter()
        .map(|e| match &e.name {
            Some(label) => format!("{}: {}", label, e.type_name.name),
            None => e.type_name.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    Some(TypeName::with_composite(
        format!("({})", name),
        CompositeType::Tuple(elements),
    ))
}

fn infer_collection(body: &str) -> Option<TypeName> {
    let items = comma_separated(body);
    let is_dictionary = items
        .first()
        .is_some_and(|first| split_first_top_level(first, ':').is_some());

    if !is_dictionary {
        let element_types = items
            .iter()
            .map(|item| infer_type(item))
            .collect::<Option<Vec<_>>>()?;
        let element = unify(element_types);
        return Some(TypeName::with_composite(
            format!("[{}]", element.name),
            CompositeType::Array(Box::new(element)),
        ));
    }

    let mut key_types = Vec::new();
    let mut value_types = Vec::new();
    for item in items {
        let (key, value) = split_first_top_level(item, ':')?;
        key_types.push(infer_type(key)?);
        value_types.push(infer_type(value)?);
    }
    let key = unify(key_types);
    let value = unify(value_types);
    Some(TypeName::with_composite(
        format!("[{}: {}]", key.name, value.name),
        CompositeType::Dictionary {
            key: Box::new(key),
            value: Box::new(value),
        },
    ))
}

/// Collapse element types into one.
///
/// One distinct type is kept as is. Exactly two where one is `Optional`
/// become the other type marked optional. Anything else is `Any`.
fn unify(types: Vec<TypeName>) -> TypeName {
    let distinct: BTreeSet<&str> = types.iter().map(|t| t.name.as_str()).collect();
    if distinct.len() == 1 {
        if let Some(first) = types.into_iter().next() {
            return first;
        }
    } else if distinct.len() == 2 && distinct.contains(OPTIONAL) {
        if let Some(other) = types.iter().find(|t| t.name != OPTIONAL) {
            return TypeName::optional_of(other);
        }
    }
    TypeName::plain(ANY)
}
