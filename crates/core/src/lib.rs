//! Declgraph Core - Semantic Declaration Model
//!
//! This crate turns the declaration structure tree produced by an external
//! source-analysis service into a typed model for code generation:
//! - Types with their variables, methods, nested types, enum cases and typealiases
//! - Literal type inference for untyped variable initializers
//! - Attribute and typealias extraction from raw text and tokens
//! - Argument-label binding for method parameters

pub mod config;
pub mod diagnostics;
pub mod model;
pub mod parser;
pub mod structure;
pub mod syntax;
pub mod text;

pub use config::{DeclgraphConfig, ParserConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use model::{
    AssociatedValue, Attribute, AttributeArgument, EnumCase, Method, MethodParameter, Type,
    TypeForest, TypeId, TypeKind, TypeName, Typealias, Variable,
};
pub use parser::infer::infer_type;
pub use parser::{
    AnnotationSource, FileParser, NoAnnotations, ParseError, ParsedFile, ParsedModule, SourceUnit,
};
pub use structure::{AccessLevel, ByteRange, DeclarationKind, Structure};

/// Declgraph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
