//! Depth-first traversal from entrance layers to models.
//!
//! Statements are appended in the order their node becomes ready. A layer
//! with a single input is ready as soon as its predecessor is emitted; a
//! layer with several inputs and every model wait in the [`JoinRegistry`]
//! until all declared predecessors have arrived.

use std::collections::HashSet;

use log::{debug, info, trace};

use kmb_core::{
    argument::Argument,
    document::{Document, Entity, Inputs, LayerNode, MODEL_INPUTS, MODEL_OUTPUTS, Mode, ModelNode},
    identifier::NodeId,
};

use crate::{
    compilation::Compilation,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result},
    registry::{Arrival, JoinRegistry},
    resolve::Resolver,
    statement::{LAYER_SOURCE, MODEL_SOURCE, Statement},
};

/// Traversal state for one compilation.
pub(crate) struct Walker<'doc> {
    document: &'doc Document,
    registry: JoinRegistry,
    resolver: Resolver<'doc>,
    statements: Vec<Statement>,
    endpoints: Vec<String>,
    emitted: HashSet<NodeId>,
}

impl<'doc> Walker<'doc> {
    pub(crate) fn new(document: &'doc Document) -> Self {
        Self {
            document,
            registry: JoinRegistry::new(),
            resolver: Resolver::new(document),
            statements: Vec::new(),
            endpoints: Vec::new(),
            emitted: HashSet::new(),
        }
    }

    /// Walks from every entrance in document order.
    pub(crate) fn walk(mut self) -> Result<Compilation> {
        let document = self.document;

        for entity in document.entities() {
            let Entity::Layer(layer) = entity else {
                continue;
            };
            if !layer.is_entrance() {
                continue;
            }
            if layer.mode() == Mode::Ca {
                return Err(inline_layer_in_flow(entity, None));
            }
            if self.emitted.contains(&layer.id()) {
                continue;
            }

            debug!(entrance:% = entity.label(); "Walking from entrance");
            self.emit_layer(entity, layer, None)?;
        }

        let unused = self.unused_warnings();
        let (placeholders, sources, mut warnings) = self.resolver.finish();
        warnings.extend(unused);
        info!(
            statements = self.statements.len(),
            endpoints = self.endpoints.len(),
            warnings = warnings.len();
            "Traversal finished"
        );

        Ok(Compilation::new(
            self.statements,
            self.endpoints,
            placeholders,
            sources,
            warnings,
        ))
    }

    fn emit_layer(
        &mut self,
        entity: &'doc Entity,
        layer: &'doc LayerNode,
        call: Option<String>,
    ) -> Result<()> {
        let source = self.resolver.touch_source(LAYER_SOURCE);
        let args = self.resolver.resolve_args(entity)?;
        let statement = Statement::new(layer.var(), source, layer.class(), args, call);
        trace!(statement:% = statement; "Emitted layer");

        self.statements.push(statement);
        self.resolver.materialize(layer);
        self.emitted.insert(layer.id());

        for next in layer.output() {
            self.visit(*next, entity, layer)?;
        }
        Ok(())
    }

    fn visit(&mut self, id: NodeId, from: &'doc Entity, from_layer: &'doc LayerNode) -> Result<()> {
        let document = self.document;
        let Some(target) = document.get(id) else {
            return Err(missing_connection(
                from,
                format!("is connected to `{id}`, which does not exist"),
            ));
        };

        match target {
            Entity::Model(model) => self.arrive_model(target, model, from),
            Entity::Layer(layer) if layer.mode() == Mode::Ca => {
                Err(inline_layer_in_flow(target, Some(from)))
            }
            Entity::Layer(layer) => self.arrive_layer(target, layer, from, from_layer),
            Entity::Unit(_) | Entity::Placeholder(_) | Entity::Note(_) => Err(missing_connection(
                from,
                format!(
                    "is connected to {} `{}`, which cannot take an input",
                    target.tag(),
                    target.label()
                ),
            )
            .with_secondary_label_at(target.span(), "connection target")),
        }
    }

    fn arrive_layer(
        &mut self,
        target: &'doc Entity,
        layer: &'doc LayerNode,
        from: &'doc Entity,
        from_layer: &'doc LayerNode,
    ) -> Result<()> {
        if self.emitted.contains(&layer.id()) {
            trace!(layer:% = target.label(); "Layer already emitted");
            return Ok(());
        }

        match layer.input() {
            Inputs::Single(single) if *single == from.id() => {
                self.emit_layer(target, layer, Some(from_layer.var().to_string()))
            }
            Inputs::Many(ids) => {
                self.registry.register(layer.id(), [ids.iter().copied()]);
                match self.registry.arrive(layer.id(), from.id()) {
                    Arrival::Satisfied => {
                        let call = self.predecessor_vars(ids);
                        self.emit_layer(target, layer, Some(call))
                    }
                    Arrival::Pending => {
                        trace!(layer:% = target.label(), from:% = from.label(); "Join pending");
                        Ok(())
                    }
                    Arrival::Undeclared => Err(not_an_input(target, from)),
                }
            }
            Inputs::Single(_) | Inputs::None => Err(not_an_input(target, from)),
        }
    }

    fn arrive_model(
        &mut self,
        target: &'doc Entity,
        model: &'doc ModelNode,
        from: &'doc Entity,
    ) -> Result<()> {
        let inputs = model_role(target, model.inputs(), MODEL_INPUTS)?;
        let outputs = model_role(target, model.outputs(), MODEL_OUTPUTS)?;
        self.registry
            .register(model.id(), [inputs.id_list(), outputs.id_list()]);

        match self.registry.arrive(model.id(), from.id()) {
            Arrival::Satisfied => {
                let source = self.resolver.touch_source(MODEL_SOURCE);
                let args = self.resolver.resolve_args(target)?;
                self.statements
                    .push(Statement::new(model.var(), source, model.class(), args, None));
                self.endpoints.push(model.var().to_string());
                self.emitted.insert(model.id());
                info!(model:% = target.label(); "Model released");
                Ok(())
            }
            Arrival::Pending => {
                trace!(model:% = target.label(), from:% = from.label(); "Model join pending");
                Ok(())
            }
            Arrival::Undeclared => Err(missing_connection(
                from,
                format!(
                    "is connected to `{}`, which lists it in neither `{MODEL_INPUTS}` nor `{MODEL_OUTPUTS}`",
                    target.label()
                ),
            )
            .with_secondary_label_at(target.span(), "model declared here")),
        }
    }

    /// The call argument of a joined layer, in declaration order.
    fn predecessor_vars(&self, ids: &[NodeId]) -> String {
        let vars: Vec<&str> = ids
            .iter()
            .filter_map(|id| match self.document.get(*id) {
                Some(Entity::Layer(layer)) => Some(layer.var()),
                _ => None,
            })
            .collect();

        match vars.as_slice() {
            [single] => (*single).to_string(),
            _ => format!("[{}]", vars.join(", ")),
        }
    }

    /// Layers first, then models, each in document order.
    fn unused_warnings(&self) -> Vec<Diagnostic> {
        let mut warnings = DiagnosticCollector::new();

        for entity in self.document.entities() {
            let Entity::Layer(layer) = entity else {
                continue;
            };
            if self.emitted.contains(&layer.id()) || self.resolver.is_inlined(layer.id()) {
                continue;
            }
            warnings.emit(
                Diagnostic::warning(format!("layer `{}` is never used", entity.label()))
                    .with_code(ErrorCode::W001)
                    .with_label_at(entity.span(), "unused layer"),
            );
        }

        for entity in self.document.entities() {
            let Entity::Model(model) = entity else {
                continue;
            };
            if self.emitted.contains(&model.id()) {
                continue;
            }
            let reason = if self.registry.is_pending(model.id()) {
                "is still waiting for some of its inputs or outputs"
            } else {
                "is never reached"
            };
            warnings.emit(
                Diagnostic::warning(format!("model `{}` {reason}", entity.label()))
                    .with_code(ErrorCode::W002)
                    .with_label_at(entity.span(), "unreleased model"),
            );
        }

        debug!(count = warnings.len(); "Collected traversal warnings");
        warnings.finish()
    }
}

fn model_role<'a>(model: &Entity, arg: Option<&'a Argument>, name: &str) -> Result<&'a Argument> {
    match arg {
        Some(arg) if !arg.is_unset() => Ok(arg),
        _ => Err(Diagnostic::error(format!(
            "missing required argument `{name}` of `{}`",
            model.label()
        ))
        .with_code(ErrorCode::E300)
        .with_label_at(model.span(), "model declared here")
        .with_help(format!("list the layers of `{name}` separated by `;`"))),
    }
}

fn missing_connection(from: &Entity, what: String) -> Diagnostic {
    Diagnostic::error(format!("`{}` {what}", from.label()))
        .with_code(ErrorCode::E200)
        .with_label_at(from.span(), "connection declared here")
        .with_help("reconnect the layer or remove the edge")
}

fn not_an_input(target: &Entity, from: &Entity) -> Diagnostic {
    missing_connection(
        from,
        format!(
            "is connected to `{}`, which does not list it as an input",
            target.label()
        ),
    )
    .with_secondary_label_at(target.span(), "inputs declared here")
}

fn inline_layer_in_flow(layer: &Entity, from: Option<&Entity>) -> Diagnostic {
    let message = match from {
        Some(from) => format!(
            "`{}` is connected to inline layer `{}`",
            from.label(),
            layer.label()
        ),
        None => format!("inline layer `{}` is marked as an entrance", layer.label()),
    };
    Diagnostic::error(message)
        .with_code(ErrorCode::E202)
        .with_label_at(layer.span(), "layer in CA mode")
        .with_help("a CA layer is only emitted as the argument of an AC layer; use it through an `id` argument")
}
