//! Variable, method and parameter parsing

use super::attributes::parse_declaration_attributes;
use super::infer::infer_type;
use super::ParseContext;
use crate::model::{Method, MethodParameter, TypeName, Variable};
use crate::structure::{AccessLevel, ByteRange, DeclarationKind, Requirements, Structure};
use crate::text::split_top_level;

/// Text between the end of the name and the body (or the end of the
/// declaration when there is no body)
pub(crate) fn name_suffix<'t>(node: &Structure, contents: &'t str) -> Option<&'t str> {
    let name_end = node.name_range()?.end()?;
    let end = match node.body_offset {
        Some(body_offset) => body_offset,
        None => node.range()?.end()?,
    };
    if end < name_end {
        return None;
    }
    ByteRange::new(name_end, end - name_end).slice(contents)
}

pub(crate) fn parse_variable(
    node: &Structure,
    requirements: &Requirements,
    is_static: bool,
    ctx: &ParseContext,
) -> Option<Variable> {
    if requirements.access.is_hidden() {
        return None;
    }

    let type_name = match &node.type_name {
        Some(explicit) => Some(TypeName::new(explicit)),
        None => name_suffix(node, ctx.contents)
            .map(str::trim)
            .and_then(|suffix| suffix.strip_prefix('='))
            .and_then(|value| {
                let first_line = value.trim().lines().next().unwrap_or_default();
                infer_type(first_line.trim_end().trim_end_matches('{'))
            }),
    };
    let type_name = type_name.unwrap_or_else(|| {
        TypeName::unknown(node.range().and_then(|range| range.slice(ctx.contents)))
    });

    let has_body = node.body_length.unwrap_or(0) > 0;
    let setter = node.setter_access_level();

    Some(Variable {
        name: requirements.name.clone(),
        type_name,
        read_access: requirements.access,
        write_access: setter.unwrap_or(AccessLevel::None),
        is_computed: has_body && setter.is_none(),
        is_static,
        attributes: parse_declaration_attributes(node, ctx.contents),
        annotations: ctx.annotations.annotations_for(node),
        defined_in_type_name: None,
    })
}

pub(crate) fn parse_method(
    node: &Structure,
    requirements: &Requirements,
    ctx: &ParseContext,
) -> Option<Method> {
    if requirements.access.is_hidden() {
        return None;
    }
    let name_range = node.name_range()?;
    let name = name_range.slice(ctx.contents)?;

    let suffix = if node.body_offset.is_some() {
        name_suffix(node, ctx.contents).map(|s| s.trim_end().trim_end_matches('{'))
    } else {
        name_range
            .end()
            .and_then(|end| line_suffix(ctx.contents, end))
    };
    let (return_type, throws) = parse_signature_suffix(suffix.unwrap_or_default());
    // filled in with the owning type's name once attached
    let return_type = if name.starts_with("init(") {
        TypeName::plain("")
    } else {
        return_type
    };

    Some(Method {
        name: name.to_string(),
        selector_name: requirements.name.clone(),
        return_type,
        throws,
        access_level: requirements.access,
        is_static: requirements.kind == DeclarationKind::MethodStatic,
        is_class: requirements.kind == DeclarationKind::MethodClass,
        is_failable_initializer: name.starts_with("init?"),
        attributes: parse_declaration_attributes(node, ctx.contents),
        annotations: ctx.annotations.annotations_for(node),
        parameters: Vec::new(),
        defined_in_type_name: None,
        name_range: Some(name_range),
    })
}

/// Rest of the source line after `from`, up to the first top-level `;`
fn line_suffix(contents: &str, from: usize) -> Option<&str> {
    let rest = contents.get(from..)?;
    let line = rest.split('\n').next().unwrap_or_default();
    let line = line.split("//").next().unwrap_or_default();
    split_top_level(line, ';').into_iter().next()
}

/// Split `throws -> Int` into its return type and throwing flag
pub fn parse_signature_suffix(suffix: &str) -> (TypeName, bool) {
    let mut rest = suffix.trim();
    if let Some(stripped) = rest.strip_prefix("async") {
        rest = stripped.trim_start();
    }

    let mut throws = false;
    for keyword in ["throws", "rethrows"] {
        if let Some(stripped) = rest.strip_prefix(keyword) {
            throws = true;
            rest = stripped.trim_start();
            break;
        }
    }

    let return_type = match rest.strip_prefix("->") {
        Some(explicit) => TypeName::new(explicit.trim()),
        None if !rest.is_empty() => TypeName::new(rest),
        None => TypeName::void(),
    };
    (return_type, throws)
}

pub(crate) fn parse_parameter(node: &Structure, requirements: &Requirements) -> Option<MethodParameter> {
    let type_name = node.type_name.as_deref()?;
    Some(MethodParameter {
        name: requirements.name.clone(),
        argument_label: None,
        type_name: TypeName::new(type_name),
        range: node.range(),
    })
}
