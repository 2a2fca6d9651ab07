//! Structure tree emitted by the upstream source-analysis service
//!
//! The tree is the SourceKit-style JSON document: every node is a dictionary
//! of `key.*` fields with nested declarations under `key.substructure`.
//! All fields are optional so a partially-populated node still deserializes;
//! the walker decides what it can make of it.

use crate::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const KIND_PREFIX: &str = "source.lang.swift.decl.";
const ACCESS_PREFIX: &str = "source.lang.swift.accessibility.";
const ATTRIBUTE_PREFIX: &str = "source.decl.attribute.";

/// A byte span into the raw file contents
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub offset: usize,
    pub length: usize,
}

impl ByteRange {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset, `None` when it does not fit in `usize`
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }

    /// Whether `other` lies entirely within this range. Ranges whose end
    /// overflows contain nothing and are contained by nothing.
    pub fn contains(&self, other: &ByteRange) -> bool {
        match (self.end(), other.end()) {
            (Some(end), Some(other_end)) => other.offset >= self.offset && other_end <= end,
            _ => false,
        }
    }

    /// Slice `text` by this range.
    ///
    /// Returns `None` when the range runs past the end of the text or does
    /// not fall on UTF-8 character boundaries.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.offset..self.end()?)
    }
}

/// `{ "key.name": ... }` entry of `key.inheritedtypes`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InheritedTypeEntry {
    #[serde(rename = "key.name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `{ "key.attribute": ... }` entry of `key.attributes`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttributeEntry {
    #[serde(rename = "key.attribute", default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

/// One declaration node of the structure tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Structure {
    #[serde(rename = "key.kind", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "key.name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "key.accessibility", default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,

    #[serde(
        rename = "key.setter_accessibility",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub setter_accessibility: Option<String>,

    /// Explicit type annotation (variables and parameters)
    #[serde(rename = "key.typename", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(rename = "key.inheritedtypes", default, skip_serializing_if = "Vec::is_empty")]
    pub inherited_types: Vec<InheritedTypeEntry>,

    #[serde(rename = "key.attributes", default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeEntry>,

    #[serde(rename = "key.offset", default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    #[serde(rename = "key.length", default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    #[serde(rename = "key.nameoffset", default, skip_serializing_if = "Option::is_none")]
    pub name_offset: Option<usize>,

    #[serde(rename = "key.namelength", default, skip_serializing_if = "Option::is_none")]
    pub name_length: Option<usize>,

    #[serde(rename = "key.bodyoffset", default, skip_serializing_if = "Option::is_none")]
    pub body_offset: Option<usize>,

    #[serde(rename = "key.bodylength", default, skip_serializing_if = "Option::is_none")]
    pub body_length: Option<usize>,

    #[serde(rename = "key.substructure", default, skip_serializing_if = "Vec::is_empty")]
    pub substructure: Vec<Structure>,
}

impl Structure {
    /// Deserialize a structure tree from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Span of the whole declaration
    pub fn range(&self) -> Option<ByteRange> {
        Some(ByteRange::new(self.offset?, self.length?))
    }

    /// Span of the declared name (for methods: the full signature name)
    pub fn name_range(&self) -> Option<ByteRange> {
        Some(ByteRange::new(self.name_offset?, self.name_length?))
    }

    /// Span between the braces of the declaration body
    pub fn body_range(&self) -> Option<ByteRange> {
        Some(ByteRange::new(self.body_offset?, self.body_length?))
    }

    pub fn declaration_kind(&self) -> Option<DeclarationKind> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }

    /// Read access level, `AccessLevel::None` when the tag is absent
    pub fn access_level(&self) -> AccessLevel {
        self.accessibility
            .as_deref()
            .map(AccessLevel::from_tag)
            .unwrap_or_default()
    }

    /// Write access level, `None` when the declaration has no setter
    pub fn setter_access_level(&self) -> Option<AccessLevel> {
        self.setter_accessibility
            .as_deref()
            .map(AccessLevel::from_tag)
    }

    /// Inherited type names in declaration order
    pub fn inherited_type_names(&self) -> Vec<String> {
        self.inherited_types
            .iter()
            .filter_map(|entry| entry.name.clone())
            .collect()
    }

    /// Textual forms of the attributes the service reported for this node
    /// (e.g. `objc`, `discardableResult`), access modifiers excluded.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter_map(|entry| entry.attribute.as_deref())
            .filter_map(attribute_textual_form)
            .collect()
    }

    /// Kind, name and access level, if the node carries enough to classify
    pub fn requirements(&self) -> Option<Requirements> {
        Some(Requirements {
            kind: self.declaration_kind()?,
            name: self.name.clone()?,
            access: self.access_level(),
        })
    }
}

fn attribute_textual_form(tag: &str) -> Option<String> {
    let raw = tag.strip_prefix(ATTRIBUTE_PREFIX)?;
    // `objc.name` is reported for `@objc(customName)`
    let name = raw.split('.').next().unwrap_or(raw);
    match name {
        "" | "public" | "internal" | "private" | "fileprivate" => None,
        _ => Some(name.to_string()),
    }
}

/// The minimum a node must carry to be classified
#[derive(Debug, Clone, PartialEq)]
pub struct Requirements {
    pub kind: DeclarationKind,
    pub name: String,
    pub access: AccessLevel,
}

/// Declaration kinds reported by the structure tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Protocol,
    Class,
    Struct,
    Enum,
    Extension,
    ExtensionClass,
    ExtensionStruct,
    ExtensionEnum,
    ExtensionProtocol,
    /// `case a, b` grouping node; the elements are its children
    EnumCase,
    EnumElement,
    VarInstance,
    VarStatic,
    VarClass,
    VarLocal,
    VarGlobal,
    VarParameter,
    MethodInstance,
    MethodStatic,
    MethodClass,
    FunctionFree,
    Typealias,
    AssociatedType,
    Other(String),
}

impl FromStr for DeclarationKind {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let kind = match tag.strip_prefix(KIND_PREFIX) {
            Some("protocol") => Self::Protocol,
            Some("class") => Self::Class,
            Some("struct") => Self::Struct,
            Some("enum") => Self::Enum,
            Some("extension") => Self::Extension,
            Some("extension.class") => Self::ExtensionClass,
            Some("extension.struct") => Self::ExtensionStruct,
            Some("extension.enum") => Self::ExtensionEnum,
            Some("extension.protocol") => Self::ExtensionProtocol,
            Some("enumcase") => Self::EnumCase,
            Some("enumelement") => Self::EnumElement,
            Some("var.instance") => Self::VarInstance,
            Some("var.static") => Self::VarStatic,
            Some("var.class") => Self::VarClass,
            Some("var.local") => Self::VarLocal,
            Some("var.global") => Self::VarGlobal,
            Some("var.parameter") => Self::VarParameter,
            Some("function.method.instance") => Self::MethodInstance,
            Some("function.method.static") => Self::MethodStatic,
            Some("function.method.class") => Self::MethodClass,
            Some("function.free") => Self::FunctionFree,
            Some("typealias") => Self::Typealias,
            Some("associatedtype") => Self::AssociatedType,
            _ => Self::Other(tag.to_string()),
        };
        Ok(kind)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self {
            Self::Protocol => "protocol",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Extension => "extension",
            Self::ExtensionClass => "extension.class",
            Self::ExtensionStruct => "extension.struct",
            Self::ExtensionEnum => "extension.enum",
            Self::ExtensionProtocol => "extension.protocol",
            Self::EnumCase => "enumcase",
            Self::EnumElement => "enumelement",
            Self::VarInstance => "var.instance",
            Self::VarStatic => "var.static",
            Self::VarClass => "var.class",
            Self::VarLocal => "var.local",
            Self::VarGlobal => "var.global",
            Self::VarParameter => "var.parameter",
            Self::MethodInstance => "function.method.instance",
            Self::MethodStatic => "function.method.static",
            Self::MethodClass => "function.method.class",
            Self::FunctionFree => "function.free",
            Self::Typealias => "typealias",
            Self::AssociatedType => "associatedtype",
            Self::Other(tag) => return write!(f, "{}", tag),
        };
        write!(f, "{}{}", KIND_PREFIX, suffix)
    }
}

/// Declaration access level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Open,
    Public,
    Internal,
    FilePrivate,
    Private,
    #[default]
    None,
}

impl AccessLevel {
    /// Parse a `source.lang.swift.accessibility.*` tag (the bare level name
    /// is accepted too). Unknown tags map to `None`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.strip_prefix(ACCESS_PREFIX).unwrap_or(tag) {
            "open" => Self::Open,
            "public" => Self::Public,
            "internal" => Self::Internal,
            "fileprivate" => Self::FilePrivate,
            "private" => Self::Private,
            _ => Self::None,
        }
    }

    /// `private` and `fileprivate` members are never materialized
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Private | Self::FilePrivate)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Open => write!(f, "open"),
            AccessLevel::Public => write!(f, "public"),
            AccessLevel::Internal => write!(f, "internal"),
            AccessLevel::FilePrivate => write!(f, "fileprivate"),
            AccessLevel::Private => write!(f, "private"),
            AccessLevel::None => Ok(()),
        }
    }
}
