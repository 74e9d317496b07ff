//! Argument resolution.
//!
//! Turns a node's ordered argument list into the text of a keyword-argument
//! list. Reference arguments are followed into the referenced entity:
//! placeholders become member reads, units and `CA` layers are inlined as
//! constructor calls, and materialized layers are referred to by variable.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use log::{debug, trace, warn};

use kmb_core::{
    argument::{ArgClass, Argument},
    document::{Document, Entity, LayerNode},
    identifier::NodeId,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    statement::LAYER_SOURCE,
};

/// Resolves arguments for one compilation.
///
/// Owns the resolve cache: materialized layers map to their variable name,
/// and units and `CA` layers map to their inline expression once resolved.
#[derive(Debug)]
pub(crate) struct Resolver<'doc> {
    document: &'doc Document,
    cache: HashMap<NodeId, String>,
    resolving: IndexSet<NodeId>,
    inlined: HashSet<NodeId>,
    placeholders: IndexSet<String>,
    sources: IndexSet<String>,
    warnings: Vec<Diagnostic>,
}

impl<'doc> Resolver<'doc> {
    pub(crate) fn new(document: &'doc Document) -> Self {
        Self {
            document,
            cache: HashMap::new(),
            resolving: IndexSet::new(),
            inlined: HashSet::new(),
            placeholders: IndexSet::new(),
            sources: IndexSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Records that `layer` now exists as a variable in the build method.
    pub(crate) fn materialize(&mut self, layer: &LayerNode) {
        self.cache.insert(layer.id(), layer.var().to_string());
    }

    /// Records an import group and returns it.
    pub(crate) fn touch_source(&mut self, source: &str) -> String {
        if !self.sources.contains(source) {
            trace!(source; "New import source");
            self.sources.insert(source.to_string());
        }
        source.to_string()
    }

    /// Returns `true` if the layer was emitted inline inside another call.
    pub(crate) fn is_inlined(&self, id: NodeId) -> bool {
        self.inlined.contains(&id)
    }

    /// Consumes the resolver, returning placeholder names and import sources
    /// in first-seen order, and the warnings raised while resolving.
    pub(crate) fn finish(self) -> (Vec<String>, Vec<String>, Vec<Diagnostic>) {
        (
            self.placeholders.into_iter().collect(),
            self.sources.into_iter().collect(),
            self.warnings,
        )
    }

    /// Renders the keyword-argument list of `owner`.
    pub(crate) fn resolve_args(&mut self, owner: &Entity) -> Result<String> {
        let rendered = owner
            .args()
            .iter()
            .map(|arg| self.resolve_argument(owner, arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    fn resolve_argument(&mut self, owner: &Entity, arg: &Argument) -> Result<String> {
        if arg.is_unset() {
            return Err(missing_required(owner, arg));
        }

        let items = arg
            .items()
            .map(|item| self.resolve_item(owner, arg, item.trim()))
            .collect::<Result<Vec<_>>>()?;

        Ok(match items.as_slice() {
            [single] => format!("{}={}", arg.name(), single),
            _ => format!("{}=[{}]", arg.name(), items.join(", ")),
        })
    }

    fn resolve_item(&mut self, owner: &Entity, arg: &Argument, item: &str) -> Result<String> {
        match arg.class() {
            ArgClass::Str => Ok(quote(item)),
            ArgClass::Num | ArgClass::Seq | ArgClass::Bool => Ok(item.to_string()),
            ArgClass::Id => self.resolve_reference(owner, arg, NodeId::new(item)),
        }
    }

    fn resolve_reference(&mut self, owner: &Entity, arg: &Argument, id: NodeId) -> Result<String> {
        if let Some(cached) = self.cache.get(&id) {
            return Ok(cached.clone());
        }

        let document = self.document;
        let Some(target) = document.get(id) else {
            return Err(unresolved_reference(
                owner,
                arg,
                format!("refers to `{id}`, which does not exist"),
            ));
        };

        match target {
            Entity::Placeholder(ph) => {
                let name = ph.name().to_string();
                debug!(placeholder = name; "Registering constructor parameter");
                self.placeholders.insert(name.clone());
                let expr = format!("self.{name}");
                self.cache.insert(id, expr.clone());
                Ok(expr)
            }
            Entity::Unit(unit) => {
                let source = unit.source().to_string();
                self.inline_call(target, &source, unit.class())
            }
            Entity::Layer(layer) if !layer.mode().is_materialized() => {
                let expr = self.inline_call(target, LAYER_SOURCE, layer.class())?;
                self.inlined.insert(id);
                Ok(expr)
            }
            Entity::Layer(layer) => {
                // Not yet emitted: the name is still the one the layer will get.
                warn!(
                    layer = target.label(), owner = owner.label();
                    "Argument refers to a layer that has not been emitted yet"
                );
                self.warnings.push(forward_reference(owner, arg, target));
                Ok(layer.var().to_string())
            }
            Entity::Model(_) | Entity::Note(_) => Err(unresolved_reference(
                owner,
                arg,
                format!(
                    "refers to {} `{}`, which cannot be used as an argument",
                    target.tag(),
                    target.label()
                ),
            )
            .with_secondary_label_at(target.span(), "referenced entity")),
        }
    }

    fn inline_call(&mut self, target: &Entity, source: &str, class: &str) -> Result<String> {
        let id = target.id();
        if !self.resolving.insert(id) {
            let chain = self
                .resolving
                .iter()
                .filter_map(|id| self.document.get(*id))
                .map(|entity| format!("`{}`", entity.label()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Diagnostic::error(format!(
                "argument chain {chain} refers back to `{}`",
                target.label()
            ))
            .with_code(ErrorCode::E302)
            .with_label_at(target.span(), "referenced again here")
            .with_help("an inline layer or unit cannot use itself as an argument"));
        }

        let source = self.touch_source(source);
        let args = self.resolve_args(target)?;
        self.resolving.shift_remove(&id);

        let expr = format!("{source}.{class}({args})");
        trace!(id:% = id, expr; "Inlined reference");
        self.cache.insert(id, expr.clone());
        Ok(expr)
    }
}

/// Renders a string literal with quotes and backslashes escaped.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn missing_required(owner: &Entity, arg: &Argument) -> Diagnostic {
    Diagnostic::error(format!(
        "missing required argument `{}` ({}) of `{}`",
        arg.name(),
        arg.class(),
        owner.label()
    ))
    .with_code(ErrorCode::E300)
    .with_label_at(owner.span(), "declared on this node")
    .with_help(format!("set a value for `{}` before exporting", arg.name()))
}

fn forward_reference(owner: &Entity, arg: &Argument, layer: &Entity) -> Diagnostic {
    Diagnostic::warning(format!(
        "argument `{}` of `{}` refers to layer `{}` before it is built",
        arg.name(),
        owner.label(),
        layer.label()
    ))
    .with_code(ErrorCode::W004)
    .with_label_at(owner.span(), "argument declared on this node")
    .with_secondary_label_at(layer.span(), "layer built later")
    .with_help("connect the referenced layer so it is reached first")
}

fn unresolved_reference(owner: &Entity, arg: &Argument, what: String) -> Diagnostic {
    Diagnostic::error(format!(
        "argument `{}` of `{}` {what}",
        arg.name(),
        owner.label()
    ))
    .with_code(ErrorCode::E301)
    .with_label_at(owner.span(), "argument declared on this node")
}
