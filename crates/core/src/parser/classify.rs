//! Classification of one structure node into a model fragment

use super::attributes::parse_declaration_attributes;
use super::enum_case::parse_enum_case;
use super::members::{parse_method, parse_parameter, parse_variable};
use super::ParseContext;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::{EnumCase, Method, MethodParameter, Type, TypeForest, TypeId, TypeKind, Variable};
use crate::structure::{DeclarationKind, Requirements, Structure};

/// A classified declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Already registered in the forest
    Type(TypeId),
    Variable(Variable),
    Method(Method),
    Parameter(MethodParameter),
    EnumCase(EnumCase),
}

/// Turn one node into a fragment, or `None` if the model has no place for it.
///
/// Types are added to `forest` as roots; attaching them is up to the caller.
pub(crate) fn classify(
    requirements: &Requirements,
    inherited_types: Vec<String>,
    node: &Structure,
    ctx: &ParseContext,
    forest: &mut TypeForest,
    diagnostics: &mut Diagnostics,
) -> Option<Fragment> {
    let (kind, is_extension) = match &requirements.kind {
        DeclarationKind::Protocol => (TypeKind::Protocol, false),
        DeclarationKind::Class => (TypeKind::Class, false),
        DeclarationKind::Struct => (TypeKind::Struct, false),
        DeclarationKind::Enum => (TypeKind::Enum, false),
        DeclarationKind::Extension => (TypeKind::Unknown, true),
        DeclarationKind::ExtensionClass => (TypeKind::Class, true),
        DeclarationKind::ExtensionStruct => (TypeKind::Struct, true),
        DeclarationKind::ExtensionEnum => (TypeKind::Enum, true),
        DeclarationKind::ExtensionProtocol => (TypeKind::Protocol, true),
        DeclarationKind::EnumElement => {
            return Some(Fragment::EnumCase(parse_enum_case(
                node,
                &requirements.name,
                ctx,
                diagnostics,
            )));
        }
        DeclarationKind::VarInstance => {
            return parse_variable(node, requirements, false, ctx).map(Fragment::Variable);
        }
        DeclarationKind::VarStatic | DeclarationKind::VarClass => {
            return parse_variable(node, requirements, true, ctx).map(Fragment::Variable);
        }
        DeclarationKind::VarParameter => {
            return parse_parameter(node, requirements).map(Fragment::Parameter);
        }
        DeclarationKind::MethodInstance
        | DeclarationKind::MethodStatic
        | DeclarationKind::MethodClass => {
            return parse_method(node, requirements, ctx).map(Fragment::Method);
        }
        // locals live in bodies; typealiases come from the token scan
        DeclarationKind::VarLocal | DeclarationKind::EnumCase | DeclarationKind::Typealias => {
            return None;
        }
        other => {
            diagnostics.report(
                DiagnosticKind::UnsupportedDeclaration,
                node.offset,
                format!(
                    "Unsupported entry \"{} {} {}\"",
                    requirements.access, other, requirements.name
                ),
            );
            return None;
        }
    };

    let mut ty = Type::new(
        kind,
        requirements.name.clone(),
        requirements.access,
        is_extension,
    );
    ty.inherited_types = inherited_types;
    ty.is_generic = node
        .name_range()
        .and_then(|range| range.end())
        .is_some_and(|end| ctx.contents.as_bytes().get(end) == Some(&b'<'));
    ty.annotations = ctx.annotations.annotations_for(node);
    ty.attributes = parse_declaration_attributes(node, ctx.contents);

    Some(Fragment::Type(forest.add_type(ty)))
}
