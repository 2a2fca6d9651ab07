//! Structure-tree to semantic-model parsing
//!
//! One [`SourceUnit`] (file contents plus its structure tree) becomes one
//! [`ParsedFile`]: the tree is walked once, each node classified and
//! attached to its container, typealiases are picked up by token scan, and a
//! final pass binds argument labels to method parameters.

pub mod attributes;
pub mod classify;
pub mod enum_case;
pub mod infer;
pub mod labels;
pub mod members;
pub mod typealias;
mod walker;

use crate::config::ParserConfig;
use crate::diagnostics::Diagnostics;
use crate::model::{Annotations, TypeForest, TypeId, Type, Typealias};
use crate::structure::{ByteRange, Structure};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walker::Walker;

/// Error types for parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Invalid structure tree: {0}")]
    InvalidStructure(#[from] serde_json::Error),
}

/// Lookup of comment-derived annotations for a declaration node
pub trait AnnotationSource: Sync {
    fn annotations_for(&self, node: &Structure) -> Annotations;
}

/// Annotation source for units without annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl AnnotationSource for NoAnnotations {
    fn annotations_for(&self, _node: &Structure) -> Annotations {
        Annotations::new()
    }
}

/// Annotations keyed by declaration byte offset
impl AnnotationSource for HashMap<usize, Annotations> {
    fn annotations_for(&self, node: &Structure) -> Annotations {
        node.offset
            .and_then(|offset| self.get(&offset).cloned())
            .unwrap_or_default()
    }
}

impl<F> AnnotationSource for F
where
    F: Fn(&Structure) -> Annotations + Sync,
{
    fn annotations_for(&self, node: &Structure) -> Annotations {
        self(node)
    }
}

/// Read-only inputs shared by every parsing step of one unit
pub(crate) struct ParseContext<'a> {
    pub(crate) contents: &'a str,
    pub(crate) annotations: &'a dyn AnnotationSource,
}

/// Inputs for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceUnit {
    pub path: Option<PathBuf>,

    /// File contents after inline-marker stripping
    pub contents: String,

    pub structure: Structure,

    /// Named ranges reported by the marker-stripping step, passed through
    pub inline_ranges: BTreeMap<String, ByteRange>,
}

impl SourceUnit {
    pub fn new(contents: impl Into<String>, structure: Structure) -> Self {
        Self {
            path: None,
            contents: contents.into(),
            structure,
            inline_ranges: BTreeMap::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn from_json(contents: impl Into<String>, structure_json: &str) -> Result<Self, ParseError> {
        Ok(Self::new(contents, Structure::from_json(structure_json)?))
    }
}

/// Model of one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    pub path: Option<PathBuf>,
    pub module: Option<String>,

    /// Every type found, nested ones included
    pub types: TypeForest,

    /// Typealiases declared outside any type
    pub typealiases: Vec<Typealias>,

    pub inline_ranges: BTreeMap<String, ByteRange>,
    pub diagnostics: Diagnostics,
}

impl ParsedFile {
    /// Types without an enclosing type
    pub fn root_types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.roots()
    }

    /// First type with the given qualified name
    pub fn find_type(&self, qualified_name: &str) -> Option<&Type> {
        self.types
            .find_by_name(qualified_name)
            .first()
            .and_then(|&id| self.types.get(id))
    }
}

/// Model of several files merged together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedModule {
    pub types: TypeForest,
    pub typealiases: Vec<Typealias>,
    pub diagnostics: Diagnostics,
}

/// Builds the semantic model from structure trees
pub struct FileParser {
    config: ParserConfig,
    annotations: Box<dyn AnnotationSource>,
}

impl FileParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            annotations: Box::new(NoAnnotations),
        }
    }

    /// Use `source` for comment-derived annotations
    pub fn with_annotations(mut self, source: impl AnnotationSource + 'static) -> Self {
        self.annotations = Box::new(source);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Build the model of one file
    pub fn parse(&self, unit: &SourceUnit) -> ParsedFile {
        let mut diagnostics = Diagnostics::new(self.config.verbose);
        let ctx = ParseContext {
            contents: &unit.contents,
            annotations: self.annotations.as_ref(),
        };

        let (mut types, typealiases) = Walker::new(ctx, &mut diagnostics).walk_root(&unit.structure);
        labels::bind_all(&mut types);

        tracing::debug!(
            path = ?unit.path,
            types = types.len(),
            typealiases = typealiases.len(),
            diagnostics = diagnostics.len(),
            "parsed source unit"
        );

        ParsedFile {
            path: unit.path.clone(),
            module: self.config.module.clone(),
            types,
            typealiases,
            inline_ranges: unit.inline_ranges.clone(),
            diagnostics,
        }
    }

    /// Parse file contents together with the JSON structure tree
    pub fn parse_json(
        &self,
        path: Option<&Path>,
        contents: &str,
        structure_json: &str,
    ) -> Result<ParsedFile, ParseError> {
        let mut unit = SourceUnit::from_json(contents, structure_json)?;
        unit.path = path.map(Path::to_path_buf);
        Ok(self.parse(&unit))
    }

    /// Parse every unit on its own, in parallel.
    ///
    /// Units share nothing, so each gets its own forest and diagnostics.
    pub fn parse_files_parallel(&self, units: &[SourceUnit]) -> Vec<ParsedFile> {
        units.par_iter().map(|unit| self.parse(unit)).collect()
    }

    /// Parse units in parallel, then merge them into one module.
    ///
    /// Per-file forests are merged sequentially in input order, so the
    /// result does not depend on scheduling.
    pub fn parse_all(&self, units: &[SourceUnit]) -> ParsedModule {
        let mut module = ParsedModule::default();
        for file in self.parse_files_parallel(units) {
            module.types.merge(file.types);
            module.typealiases.extend(file.typealiases);
            module.diagnostics.extend(file.diagnostics);
        }
        module
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
