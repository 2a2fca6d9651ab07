//! Recursive walk over the structure tree

use super::classify::{classify, Fragment};
use super::typealias::extract_typealiases;
use super::ParseContext;
use crate::diagnostics::Diagnostics;
use crate::model::{Method, TypeForest, TypeId, TypeKind, TypeName, Typealias};
use crate::structure::{DeclarationKind, Structure};

/// Where classified children get attached
pub(crate) enum Container<'m> {
    Type(TypeId),
    /// A method still being built; only parameters attach to it
    Method(&'m mut Method),
}

/// Walk state for one source unit
pub(crate) struct Walker<'a> {
    ctx: ParseContext<'a>,
    forest: TypeForest,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(ctx: ParseContext<'a>, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            ctx,
            forest: TypeForest::new(),
            diagnostics,
        }
    }

    /// Walk the whole tree, returning every type found and the typealiases
    /// declared at file scope
    pub(crate) fn walk_root(mut self, root: &Structure) -> (TypeForest, Vec<Typealias>) {
        let processed = self.walk(root, None);
        let typealiases = extract_typealiases(self.ctx.contents, None, &processed);
        (self.forest, typealiases)
    }

    /// Classify and attach every child of `node`, depth first.
    ///
    /// Returns the child declarations visited at this level so the caller
    /// can exclude their text from its own typealias scan.
    fn walk<'n>(
        &mut self,
        node: &'n Structure,
        mut container: Option<&mut Container<'_>>,
    ) -> Vec<&'n Structure> {
        let mut processed = Vec::new();

        for child in &node.substructure {
            let requirements = child
                .requirements()
                .filter(|r| r.kind != DeclarationKind::EnumCase);
            let Some(requirements) = requirements else {
                tracing::trace!(kind = ?child.kind, "walking through unclassified node");
                processed.extend(self.walk(child, container.as_deref_mut()));
                continue;
            };
            if requirements.kind != DeclarationKind::Typealias {
                processed.push(child);
            }

            let inherited_types = child.inherited_type_names();
            let fragment = classify(
                &requirements,
                inherited_types,
                child,
                &self.ctx,
                &mut self.forest,
                self.diagnostics,
            );

            match fragment {
                Some(Fragment::Type(id)) => {
                    if let Some(container) = container.as_deref_mut() {
                        self.attach(container, Fragment::Type(id));
                    }
                    let inner = self.walk(child, Some(&mut Container::Type(id)));
                    self.merge_typealiases(id, child, &inner);
                }
                Some(Fragment::Method(mut method)) => {
                    self.walk(child, Some(&mut Container::Method(&mut method)));
                    if let Some(container) = container.as_deref_mut() {
                        self.attach(container, Fragment::Method(method));
                    }
                }
                Some(fragment) => {
                    self.walk(child, None);
                    if let Some(container) = container.as_deref_mut() {
                        self.attach(container, fragment);
                    }
                }
                None => {
                    self.walk(child, None);
                }
            }
        }

        processed
    }

    /// Attach a fragment to its container; unsupported pairs are ignored
    fn attach(&mut self, container: &mut Container<'_>, fragment: Fragment) {
        match (container, fragment) {
            (Container::Type(owner), Fragment::Type(nested)) => {
                self.forest.nest(*owner, nested);
            }
            (Container::Type(owner), Fragment::Variable(mut variable)) => {
                if let Some(ty) = self.forest.get_mut(*owner) {
                    variable.defined_in_type_name = Some(ty.name.clone());
                    ty.variables.push(variable);
                }
            }
            (Container::Type(owner), Fragment::Method(mut method)) => {
                if let Some(ty) = self.forest.get_mut(*owner) {
                    if method.is_initializer() {
                        method.return_type = TypeName::plain(ty.name.clone());
                    }
                    method.defined_in_type_name = Some(ty.name.clone());
                    ty.methods.push(method);
                }
            }
            (Container::Type(owner), Fragment::EnumCase(enum_case)) => {
                if let Some(ty) = self.forest.get_mut(*owner) {
                    if ty.kind == TypeKind::Enum {
                        ty.cases.push(enum_case);
                    }
                }
            }
            (Container::Method(method), Fragment::Parameter(parameter)) => {
                let within = match (method.name_range, parameter.range) {
                    (Some(name), Some(range)) => name.contains(&range),
                    _ => false,
                };
                if within {
                    method.parameters.push(parameter);
                }
            }
            _ => {}
        }
    }

    /// Scan the type's own body for typealiases once its subtree is done
    fn merge_typealiases(&mut self, id: TypeId, node: &Structure, processed: &[&Structure]) {
        let Some(body) = node.body_range() else {
            return;
        };
        let found = extract_typealiases(self.ctx.contents, Some(body), processed);
        if let Some(ty) = self.forest.get_mut(id) {
            for mut typealias in found {
                typealias.parent_name = Some(ty.name.clone());
                ty.typealiases
                    .insert(typealias.alias_name.clone(), typealias);
            }
        }
    }
}
