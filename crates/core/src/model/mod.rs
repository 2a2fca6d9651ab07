//! Semantic model produced from a structure tree
//!
//! Types are kept in a [`TypeForest`], an arena backed by a directed graph:
//! - Nodes are [`Type`]s, addressed by [`TypeId`]
//! - A `Contains` edge runs from every type to each of its nested types
//!
//! Members (variables, methods, enum cases, typealiases) are owned by value
//! inside their type. The nested-to-parent link is an id, never an owner.

pub mod nodes;
pub mod type_name;

pub use nodes::{
    Annotations, AssociatedValue, Attribute, AttributeArgument, Attributes, EnumCase, Method,
    MethodParameter, Type, TypeKind, Typealias, Variable,
};
pub use type_name::{CompositeType, TupleElement, TypeName};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle of a type inside its forest
pub type TypeId = NodeIndex;

/// Maps ids of a merged forest to their new ids in the target forest
pub type MergeMap = HashMap<TypeId, TypeId>;

/// Edge weight of the containment graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Containment {
    Contains,
}

/// Arena of all types found in one or more files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeForest {
    graph: DiGraph<Type, Containment>,
}

impl TypeForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type; it is a root until nested
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        self.graph.add_node(ty)
    }

    /// Record `child` as nested inside `parent`.
    ///
    /// Does nothing if either id is unknown or `child` already has a parent.
    pub fn nest(&mut self, parent: TypeId, child: TypeId) {
        if parent == child || self.get(parent).is_none() {
            return;
        }
        match self.graph.node_weight_mut(child) {
            Some(ty) if ty.parent.is_none() => ty.parent = Some(parent),
            _ => return,
        }
        if let Some(ty) = self.graph.node_weight_mut(parent) {
            ty.nested_types.push(child);
        }
        self.graph.add_edge(parent, child, Containment::Contains);
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.graph.node_weight(id)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut Type> {
        self.graph.node_weight_mut(id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All types in insertion (document) order
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.graph
            .node_indices()
            .map(move |id| (id, &self.graph[id]))
    }

    /// Types without an enclosing type
    pub fn roots(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types().filter(|(_, ty)| ty.parent.is_none())
    }

    pub fn parent(&self, id: TypeId) -> Option<TypeId> {
        self.graph
            .edges_directed(id, Direction::Incoming)
            .map(|edge| edge.source())
            .next()
    }

    /// Enclosing types from the innermost outwards
    pub fn ancestors(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Dot-joined name including every enclosing type, e.g. `Outer.Inner`
    pub fn qualified_name(&self, id: TypeId) -> Option<String> {
        let local = &self.get(id)?.name;
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .filter_map(|a| self.get(a).map(|ty| ty.name.as_str()))
            .collect();
        parts.push(local);
        Some(parts.join("."))
    }

    /// Find types by qualified name
    pub fn find_by_name(&self, qualified_name: &str) -> Vec<TypeId> {
        self.graph
            .node_indices()
            .filter(|&id| self.qualified_name(id).as_deref() == Some(qualified_name))
            .collect()
    }

    /// Every method of every type
    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut Method> {
        self.graph
            .node_weights_mut()
            .flat_map(|ty| ty.methods.iter_mut())
    }

    /// Get the underlying petgraph
    pub fn inner_graph(&self) -> &DiGraph<Type, Containment> {
        &self.graph
    }

    /// Merge another forest into this one.
    ///
    /// Types are re-added and every stored id (`parent`, `nested_types`) is
    /// remapped, so per-file forests built in parallel can be combined into
    /// one without collisions.
    pub fn merge(&mut self, other: TypeForest) -> MergeMap {
        let mut id_map: MergeMap = HashMap::new();

        for old_id in other.graph.node_indices() {
            let ty = other.graph[old_id].clone();
            let new_id = self.graph.add_node(ty);
            id_map.insert(old_id, new_id);
        }

        for new_id in id_map.values() {
            if let Some(ty) = self.graph.node_weight_mut(*new_id) {
                ty.parent = ty.parent.and_then(|p| id_map.get(&p).copied());
                ty.nested_types = ty
                    .nested_types
                    .iter()
                    .filter_map(|n| id_map.get(n).copied())
                    .collect();
            }
        }

        for old_edge in other.graph.edge_indices() {
            if let Some((src, tgt)) = other.graph.edge_endpoints(old_edge) {
                self.graph
                    .add_edge(id_map[&src], id_map[&tgt], other.graph[old_edge]);
            }
        }

        id_map
    }
}

impl PartialEq for TypeForest {
    fn eq(&self, other: &Self) -> bool {
        fn weights(forest: &TypeForest) -> Vec<&Type> {
            forest.graph.node_indices().map(|id| &forest.graph[id]).collect()
        }
        fn edges(forest: &TypeForest) -> Vec<(TypeId, TypeId)> {
            forest
                .graph
                .edge_indices()
                .filter_map(|e| forest.graph.edge_endpoints(e))
                .collect()
        }
        weights(self) == weights(other) && edges(self) == edges(other)
    }
}
