//! Structural checks run before traversal.

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::{algo::toposort, graph::DiGraph};

use kmb_core::{
    document::{Document, Entity},
    identifier::NodeId,
};

use crate::error::{Diagnostic, ErrorCode, Result};

/// Checks that the document has an entrance, a model, and no cycle along
/// output edges.
pub(crate) fn validate(document: &Document) -> Result<()> {
    if document.entrances().next().is_none() {
        return Err(Diagnostic::error("the document has no entrance layer")
            .with_code(ErrorCode::E100)
            .with_help("mark an input layer with `entrance = true`"));
    }

    if document.models().next().is_none() {
        return Err(Diagnostic::error("the document has no model")
            .with_code(ErrorCode::E101)
            .with_help("add a `[[model]]` with `inputs` and `outputs`"));
    }

    check_acyclic(document)
}

fn check_acyclic(document: &Document) -> Result<()> {
    let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut indices = HashMap::new();

    for entity in document.entities() {
        if matches!(entity, Entity::Layer(_) | Entity::Model(_)) {
            indices.insert(entity.id(), graph.add_node(entity.id()));
        }
    }

    for layer in document.layers() {
        let from = indices[&layer.id()];
        // Dangling targets are reported by the walker with more context.
        for to in layer.output().iter().filter_map(|id| indices.get(id)) {
            graph.add_edge(from, *to, ());
        }
    }

    trace!(nodes = graph.node_count(), edges = graph.edge_count(); "Checking for cycles");

    match toposort(&graph, None) {
        Ok(_) => {
            debug!("Document graph is acyclic");
            Ok(())
        }
        Err(cycle) => {
            let id = graph[cycle.node_id()];
            let (label, span) = document
                .get(id)
                .map(|entity| (entity.label(), entity.span()))
                .unwrap_or_else(|| (id.to_string(), None));
            Err(Diagnostic::error(format!(
                "`{label}` is part of a cycle of output connections"
            ))
            .with_code(ErrorCode::E201)
            .with_label_at(span, "cycle passes through this node")
            .with_help("the model graph must be acyclic; remove one connection of the loop"))
        }
    }
}
