//! Type names as written in source, plus the structure inferred for literals

use super::nodes::Attributes;
use crate::parser::attributes::parse_attributes;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPTIONAL: &str = "Optional";
pub const STRING: &str = "String";
pub const BOOL: &str = "Bool";
pub const INT: &str = "Int";
pub const DOUBLE: &str = "Double";
pub const VOID: &str = "Void";
pub const ANY: &str = "Any";

const UNKNOWN_PREFIX: &str = "<<unknown type";

/// A type name plus the attributes written in front of it (`@escaping`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeName {
    pub name: String,

    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    /// Element structure, filled in for inferred tuple and collection types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeType>,
}

/// Structure of a tuple, array or dictionary type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CompositeType {
    Tuple(Vec<TupleElement>),
    Array(Box<TypeName>),
    Dictionary {
        key: Box<TypeName>,
        value: Box<TypeName>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TupleElement {
    pub name: Option<String>,
    pub type_name: TypeName,
}

impl TypeName {
    /// Parse a written type, moving leading `@attribute`s into `attributes`
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.starts_with('@') {
            return Self::plain(raw);
        }

        let mut rest = raw;
        let mut prefix_end = 0;
        while let Some(after_at) = rest.strip_prefix('@') {
            let name_len = after_at
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after_at.len());
            let mut consumed = 1 + name_len;
            if after_at[name_len..].starts_with('(') {
                match after_at[name_len..].find(')') {
                    Some(close) => consumed += close + 1,
                    None => break,
                }
            }
            prefix_end += consumed;
            let trimmed = rest[consumed..].trim_start();
            prefix_end += rest[consumed..].len() - trimmed.len();
            rest = trimmed;
        }

        Self {
            name: rest.to_string(),
            attributes: parse_attributes(&raw[..prefix_end]),
            composite: None,
        }
    }

    /// A name taken verbatim, no attribute parsing
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            composite: None,
        }
    }

    pub fn with_composite(name: impl Into<String>, composite: CompositeType) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            composite: Some(composite),
        }
    }

    /// `Void`, the return type of methods without `->`
    pub fn void() -> Self {
        Self::plain(VOID)
    }

    /// Explicit marker for a variable whose type could not be determined
    pub fn unknown(declaration: Option<&str>) -> Self {
        let name = match declaration {
            Some(decl) => format!(
                "{}, please add type attribution to variable '{}'>>",
                UNKNOWN_PREFIX, decl
            ),
            None => format!("{}, please add type attribution to variable>>", UNKNOWN_PREFIX),
        };
        Self::plain(name)
    }

    /// `T?` for the given wrapped type
    pub fn optional_of(wrapped: &TypeName) -> Self {
        Self::plain(format!("{}?", wrapped.name))
    }

    pub fn is_optional(&self) -> bool {
        self.name == OPTIONAL || self.name.ends_with('?') || self.name.ends_with('!')
    }

    /// Name with a trailing `?`/`!` or an `Optional<...>` wrapper removed
    pub fn unwrapped_name(&self) -> &str {
        if let Some(inner) = self
            .name
            .strip_prefix("Optional<")
            .and_then(|s| s.strip_suffix('>'))
        {
            return inner;
        }
        self.name
            .strip_suffix('?')
            .or_else(|| self.name.strip_suffix('!'))
            .unwrap_or(&self.name)
    }

    pub fn is_void(&self) -> bool {
        self.name == VOID || self.name == "()"
    }

    pub fn is_unknown(&self) -> bool {
        self.name.starts_with(UNKNOWN_PREFIX)
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.composite, Some(CompositeType::Tuple(_)))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.composite, Some(CompositeType::Array(_)))
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self.composite, Some(CompositeType::Dictionary { .. }))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attribute in self.attributes.values() {
            write!(f, "{} ", attribute.description)?;
        }
        write!(f, "{}", self.name)
    }
}
