//! Declaration nodes of the semantic model

use super::type_name::TypeName;
use super::TypeId;
use crate::structure::{AccessLevel, ByteRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Comment-derived key/values attached to a declaration
pub type Annotations = BTreeMap<String, serde_json::Value>;

/// Attributes keyed by attribute name
pub type Attributes = BTreeMap<String, Attribute>;

/// An attribute such as `@available(iOS 10.0, *)` or `final`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub arguments: BTreeMap<String, AttributeArgument>,
    /// Human readable form, e.g. `@objc(name)`
    pub description: String,
}

/// Attribute argument value: a bare flag or a `name: "value"` string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeArgument {
    Flag(bool),
    Text(String),
}

/// The kind of a type declaration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Protocol,
    Class,
    Struct,
    Enum,
    /// Extension whose extended kind the service did not report
    Unknown,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Protocol => write!(f, "protocol"),
            TypeKind::Class => write!(f, "class"),
            TypeKind::Struct => write!(f, "struct"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Unknown => write!(f, "extension"),
        }
    }
}

/// A protocol, class, struct, enum or extension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Type {
    pub kind: TypeKind,

    /// Local (unqualified) name
    pub name: String,

    pub access_level: AccessLevel,

    /// Extensions are merged with their base type downstream
    pub is_extension: bool,

    pub is_generic: bool,

    /// Inherited type names as written, unresolved
    pub inherited_types: Vec<String>,

    pub attributes: Attributes,
    pub annotations: Annotations,
    pub variables: Vec<Variable>,
    pub methods: Vec<Method>,

    /// Nested types in declaration order
    pub nested_types: Vec<TypeId>,

    /// Enclosing type; navigational only
    pub parent: Option<TypeId>,

    /// Enum cases, empty for every other kind
    pub cases: Vec<EnumCase>,

    pub typealiases: BTreeMap<String, Typealias>,
}

impl Type {
    pub fn new(kind: TypeKind, name: String, access_level: AccessLevel, is_extension: bool) -> Self {
        Self {
            kind,
            name,
            access_level,
            is_extension,
            is_generic: false,
            inherited_types: Vec::new(),
            attributes: Attributes::new(),
            annotations: Annotations::new(),
            variables: Vec::new(),
            methods: Vec::new(),
            nested_types: Vec::new(),
            parent: None,
            cases: Vec::new(),
            typealiases: BTreeMap::new(),
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Enum with at least one case carrying associated values
    pub fn has_associated_values(&self) -> bool {
        self.cases.iter().any(|c| !c.associated_values.is_empty())
    }

    pub fn initializers(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_initializer())
    }

    pub fn static_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.is_static)
    }

    pub fn instance_variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| !v.is_static)
    }
}

/// A stored or computed property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variable {
    pub name: String,
    pub type_name: TypeName,
    pub read_access: AccessLevel,
    /// `AccessLevel::None` when the variable has no setter
    pub write_access: AccessLevel,
    pub is_computed: bool,
    pub is_static: bool,
    pub attributes: Attributes,
    pub annotations: Annotations,
    pub defined_in_type_name: Option<String>,
}

/// A method or initializer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Method {
    /// Full declaration name, e.g. `foo(_ a: Int, bar: String)`
    pub name: String,

    /// Argument-label skeleton, e.g. `foo(_:bar:)`
    pub selector_name: String,

    pub return_type: TypeName,
    pub throws: bool,
    pub access_level: AccessLevel,
    pub is_static: bool,
    pub is_class: bool,
    pub is_failable_initializer: bool,
    pub attributes: Attributes,
    pub annotations: Annotations,
    pub parameters: Vec<MethodParameter>,
    pub defined_in_type_name: Option<String>,

    /// Span of `name` in the raw text; parameters must fall inside it
    #[serde(skip)]
    pub name_range: Option<ByteRange>,
}

impl Method {
    pub fn is_initializer(&self) -> bool {
        self.selector_name.starts_with("init(")
    }

    /// Name without the parameter list
    pub fn short_name(&self) -> &str {
        self.selector_name
            .split('(')
            .next()
            .unwrap_or(&self.selector_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodParameter {
    /// Local name used inside the body
    pub name: String,
    /// External label, `None` for `_`
    pub argument_label: Option<String>,
    pub type_name: TypeName,

    #[serde(skip)]
    pub range: Option<ByteRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumCase {
    pub name: String,
    pub raw_value: Option<String>,
    pub associated_values: Vec<AssociatedValue>,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociatedValue {
    pub local_name: Option<String>,
    pub external_name: Option<String>,
    pub type_name: TypeName,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Typealias {
    pub alias_name: String,
    pub type_name: TypeName,
    /// Name of the owning type, `None` at file scope
    pub parent_name: Option<String>,
}
