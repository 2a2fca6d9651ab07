//! Enum element parsing: raw values and associated values

use super::ParseContext;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::{AssociatedValue, EnumCase, TypeName};
use crate::structure::Structure;
use crate::text::{comma_separated, drop_first_and_last, split_first_top_level};

/// Parse an `enumelement` node.
///
/// Cases whose text cannot be read or has an unexpected shape are still
/// produced, with no payload. Payload cases may be named in selector form
/// (`move(a:_:)`); only the part before `(` is the case name.
pub(crate) fn parse_enum_case(
    node: &Structure,
    name: &str,
    ctx: &ParseContext,
    diagnostics: &mut Diagnostics,
) -> EnumCase {
    let name = name.split('(').next().unwrap_or(name);
    let mut enum_case = EnumCase {
        name: name.to_string(),
        raw_value: None,
        associated_values: Vec::new(),
        annotations: ctx.annotations.annotations_for(node),
    };

    let key = node.range().and_then(|range| range.slice(ctx.contents));
    let Some((key, name_index)) = key.and_then(|key| Some((key, key.find(name)?))) else {
        diagnostics.report(
            DiagnosticKind::UnresolvableEnumCaseBody,
            node.offset,
            format!("Unable to extract enum case body for `{}`", name),
        );
        return enum_case;
    };

    let body = key[name_index + name.len()..].trim();
    match (body.chars().next(), body.chars().last()) {
        (None, _) => {}
        (Some('='), _) => {
            enum_case.raw_value = Some(body[1..].replace('"', "").trim().to_string());
        }
        (Some('('), Some(')')) => {
            enum_case.associated_values = parse_associated_values(drop_first_and_last(body).trim());
        }
        _ => diagnostics.report(
            DiagnosticKind::MalformedEnumCaseBody,
            node.offset,
            format!("Unknown enum case body format `{}` for `{}`", body, name),
        ),
    }

    enum_case
}

/// Parse the inside of `case name(...)`
pub fn parse_associated_values(body: &str) -> Vec<AssociatedValue> {
    if body.is_empty() {
        return vec![AssociatedValue {
            local_name: None,
            external_name: None,
            type_name: TypeName::plain("()"),
        }];
    }

    let items = comma_separated(body);
    let count = items.len();
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let default_name = (count > 1).then(|| index.to_string());
            // drop a default value, `a: Int = 0`
            let item = split_first_top_level(item, '=')
                .map(|(declared, _)| declared)
                .unwrap_or(item)
                .trim();

            match split_first_top_level(item, ':') {
                None => AssociatedValue {
                    local_name: None,
                    external_name: default_name,
                    type_name: TypeName::new(item),
                },
                Some((label, type_text)) if label.trim() == "_" => AssociatedValue {
                    local_name: None,
                    external_name: default_name,
                    type_name: TypeName::new(type_text),
                },
                Some((label, type_text)) => {
                    let local_name = label.trim().to_string();
                    let external_name = if count > 1 {
                        Some(local_name.clone())
                    } else {
                        default_name
                    };
                    AssociatedValue {
                        local_name: Some(local_name),
                        external_name,
                        type_name: TypeName::new(type_text),
                    }
                }
            }
        })
        .collect()
}
