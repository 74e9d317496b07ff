//! The id-addressed graph document.
//!
//! A [`Document`] is a flat, insertion-ordered collection of [`Entity`]
//! values. Edges are not stored separately: layers name their predecessors in
//! `input` and their successors in `output`, and models name the layers they
//! wrap through their `inputs`/`outputs` arguments.
//!
//! # Example
//!
//! ```
//! use kmb_core::{
//!     argument::{ArgClass, Argument},
//!     document::{Document, LayerNode, ModelNode},
//! };
//!
//! let mut doc = Document::new();
//! doc.insert(
//!     LayerNode::new("1", "input_1", "Input")
//!         .entrance()
//!         .with_arg(Argument::new("shape", "(32,)", ArgClass::Seq))
//!         .with_output(&["2".into()]),
//! )
//! .unwrap();
//! doc.insert(
//!     ModelNode::new("2", "model")
//!         .with_inputs(&["1".into()])
//!         .with_outputs(&["1".into()]),
//! )
//! .unwrap();
//!
//! assert_eq!(doc.entrances().count(), 1);
//! assert_eq!(doc.models().count(), 1);
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    argument::{Argument, parse_id_list},
    identifier::NodeId,
    span::Span,
};

/// Name of the model argument listing its input layers.
pub const MODEL_INPUTS: &str = "inputs";

/// Name of the model argument listing its output layers.
pub const MODEL_OUTPUTS: &str = "outputs";

/// Class name every model node is emitted with.
pub const MODEL_CLASS: &str = "Model";

/// Errors raised while assembling a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("duplicate entity id `{0}`")]
    DuplicateId(NodeId),

    #[error("unknown layer mode `{0}` (expected IO, CA or AC)")]
    UnknownMode(String),

    #[error("unknown argument class `{0}` (expected str, num, seq, bool or id)")]
    UnknownArgClass(String),
}

/// How a layer takes part in code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Mode {
    /// Ordinary layer emitted as its own statement.
    #[default]
    #[serde(rename = "IO")]
    Io,
    /// Layer that is only emitted inline where another node's argument
    /// refers to it.
    #[serde(rename = "CA")]
    Ca,
    /// Layer that accepts a [`Mode::Ca`] layer as one of its arguments.
    #[serde(rename = "AC")]
    Ac,
}

impl Mode {
    /// Returns `true` if layers in this mode get their own statement.
    pub fn is_materialized(&self) -> bool {
        matches!(self, Mode::Io | Mode::Ac)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Io => f.write_str("IO"),
            Mode::Ca => f.write_str("CA"),
            Mode::Ac => f.write_str("AC"),
        }
    }
}

impl FromStr for Mode {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IO" => Ok(Mode::Io),
            "CA" => Ok(Mode::Ca),
            "AC" => Ok(Mode::Ac),
            other => Err(DocumentError::UnknownMode(other.to_string())),
        }
    }
}

/// Canvas position, carried only so documents survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The predecessors a layer declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Inputs {
    /// No predecessors; only valid for entrances and inline layers.
    #[default]
    None,
    /// Exactly one predecessor.
    Single(NodeId),
    /// Several predecessors that must all arrive before the layer is ready.
    Many(Vec<NodeId>),
}

impl Inputs {
    /// Parses the separator-joined wire form of an `input` field.
    ///
    /// # Examples
    ///
    /// ```
    /// use kmb_core::document::Inputs;
    ///
    /// assert_eq!(Inputs::parse("null"), Inputs::None);
    /// assert_eq!(Inputs::parse("7"), Inputs::Single("7".into()));
    /// assert_eq!(Inputs::parse("7;8"), Inputs::Many(vec!["7".into(), "8".into()]));
    /// ```
    pub fn parse(raw: &str) -> Self {
        Self::from_ids(parse_id_list(raw))
    }

    /// Builds the variant matching the number of ids.
    pub fn from_ids(mut ids: Vec<NodeId>) -> Self {
        match ids.len() {
            0 => Inputs::None,
            1 => Inputs::Single(ids.remove(0)),
            _ => Inputs::Many(ids),
        }
    }

    /// Returns `true` if `id` is one of the declared predecessors.
    pub fn contains(&self, id: NodeId) -> bool {
        match self {
            Inputs::None => false,
            Inputs::Single(single) => *single == id,
            Inputs::Many(ids) => ids.contains(&id),
        }
    }

    /// Returns the declared predecessors in declaration order.
    pub fn ids(&self) -> &[NodeId] {
        match self {
            Inputs::None => &[],
            Inputs::Single(single) => std::slice::from_ref(single),
            Inputs::Many(ids) => ids,
        }
    }
}

/// A layer of the model graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    id: NodeId,
    var: String,
    class: String,
    mode: Mode,
    args: Vec<Argument>,
    input: Inputs,
    output: Vec<NodeId>,
    entrance: bool,
    position: Position,
    span: Option<Span>,
}

impl LayerNode {
    /// Creates an `IO` layer with no arguments and no edges.
    pub fn new(id: impl Into<NodeId>, var: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            var: var.into(),
            class: class.into(),
            mode: Mode::Io,
            args: Vec::new(),
            input: Inputs::None,
            output: Vec::new(),
            entrance: false,
            position: Position::default(),
            span: None,
        }
    }

    /// Marks this layer as a traversal entrance.
    pub fn entrance(mut self) -> Self {
        self.entrance = true;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Appends an argument, keeping declaration order.
    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_input(mut self, input: Inputs) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: &[NodeId]) -> Self {
        self.output = output.to_vec();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn input(&self) -> &Inputs {
        &self.input
    }

    pub fn output(&self) -> &[NodeId] {
        &self.output
    }

    pub fn is_entrance(&self) -> bool {
        self.entrance
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

/// The endpoint wrapping a set of input layers and output layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    id: NodeId,
    var: String,
    class: String,
    args: Vec<Argument>,
    position: Position,
    span: Option<Span>,
}

impl ModelNode {
    pub fn new(id: impl Into<NodeId>, var: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            var: var.into(),
            class: MODEL_CLASS.to_string(),
            args: Vec::new(),
            position: Position::default(),
            span: None,
        }
    }

    /// Sets the `inputs` argument, replacing any previous one.
    pub fn with_inputs(self, ids: &[NodeId]) -> Self {
        self.with_arg(Argument::ids(MODEL_INPUTS, ids))
    }

    /// Sets the `outputs` argument, replacing any previous one.
    pub fn with_outputs(self, ids: &[NodeId]) -> Self {
        self.with_arg(Argument::ids(MODEL_OUTPUTS, ids))
    }

    /// Appends an argument; an argument with the same name is replaced in place.
    pub fn with_arg(mut self, arg: Argument) -> Self {
        match self.args.iter_mut().find(|a| a.name() == arg.name()) {
            Some(slot) => *slot = arg,
            None => self.args.push(arg),
        }
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    /// Returns the `inputs` argument, if declared.
    pub fn inputs(&self) -> Option<&Argument> {
        self.arg(MODEL_INPUTS)
    }

    /// Returns the `outputs` argument, if declared.
    pub fn outputs(&self) -> Option<&Argument> {
        self.arg(MODEL_OUTPUTS)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name() == name)
    }
}

/// An auxiliary object (activation, initializer, ...) only ever used inline
/// as another node's argument.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitNode {
    id: NodeId,
    class: String,
    source: String,
    args: Vec<Argument>,
    position: Position,
    span: Option<Span>,
}

impl UnitNode {
    /// Creates a unit of `class` imported from the `source` group.
    pub fn new(id: impl Into<NodeId>, class: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            source: source.into(),
            args: Vec::new(),
            position: Position::default(),
            span: None,
        }
    }

    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// The library submodule this unit's class is imported from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

/// A named external parameter of the generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderNode {
    id: NodeId,
    name: String,
    position: Position,
    span: Option<Span>,
}

impl PlaceholderNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: Position::default(),
            span: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

/// Free text annotation; no effect on generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteNode {
    id: NodeId,
    text: String,
    position: Position,
    span: Option<Span>,
}

impl NoteNode {
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            position: Position::default(),
            span: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

/// Every kind of entity a document can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Layer(LayerNode),
    Model(ModelNode),
    Unit(UnitNode),
    Placeholder(PlaceholderNode),
    Note(NoteNode),
}

impl Entity {
    pub fn id(&self) -> NodeId {
        match self {
            Entity::Layer(layer) => layer.id(),
            Entity::Model(model) => model.id(),
            Entity::Unit(unit) => unit.id(),
            Entity::Placeholder(ph) => ph.id(),
            Entity::Note(note) => note.id(),
        }
    }

    /// The document tag of this entity kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Entity::Layer(_) => "layer",
            Entity::Model(_) => "model",
            Entity::Unit(_) => "unit",
            Entity::Placeholder(_) => "ph",
            Entity::Note(_) => "note",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Entity::Layer(layer) => layer.span(),
            Entity::Model(model) => model.span(),
            Entity::Unit(unit) => unit.span(),
            Entity::Placeholder(ph) => ph.span(),
            Entity::Note(note) => note.span(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Entity::Layer(layer) => layer.position(),
            Entity::Model(model) => model.position(),
            Entity::Unit(unit) => unit.position(),
            Entity::Placeholder(ph) => ph.position(),
            Entity::Note(note) => note.position(),
        }
    }

    /// Arguments of the entity; placeholders and notes have none.
    pub fn args(&self) -> &[Argument] {
        match self {
            Entity::Layer(layer) => layer.args(),
            Entity::Model(model) => model.args(),
            Entity::Unit(unit) => unit.args(),
            Entity::Placeholder(_) | Entity::Note(_) => &[],
        }
    }

    /// Short `Class:var` label used in messages.
    pub fn label(&self) -> String {
        match self {
            Entity::Layer(layer) => format!("{}:{}", layer.class(), layer.var()),
            Entity::Model(model) => format!("{}:{}", model.class(), model.var()),
            Entity::Unit(unit) => format!("{}.{}", unit.source(), unit.class()),
            Entity::Placeholder(ph) => format!("ph:{}", ph.name()),
            Entity::Note(note) => format!("note:{}", note.id()),
        }
    }
}

macro_rules! impl_into_entity {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for Entity {
                fn from(node: $node) -> Self {
                    Entity::$variant(node)
                }
            }
        )*
    };
}

impl_into_entity! {
    LayerNode => Layer,
    ModelNode => Model,
    UnitNode => Unit,
    PlaceholderNode => Placeholder,
    NoteNode => Note,
}

/// The graph document handed to the compiler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entities: IndexMap<NodeId, Entity>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity, rejecting ids that are already taken.
    pub fn insert(&mut self, entity: impl Into<Entity>) -> Result<(), DocumentError> {
        let entity = entity.into();
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(DocumentError::DuplicateId(id));
        }
        trace!(id:% = id, tag = entity.tag(); "Inserting entity");
        self.entities.insert(id, entity);
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over every entity in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerNode> {
        self.entities.values().filter_map(|entity| match entity {
            Entity::Layer(layer) => Some(layer),
            _ => None,
        })
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelNode> {
        self.entities.values().filter_map(|entity| match entity {
            Entity::Model(model) => Some(model),
            _ => None,
        })
    }

    /// Iterates over the layers flagged as traversal entrances.
    pub fn entrances(&self) -> impl Iterator<Item = &LayerNode> {
        self.layers().filter(|layer| layer.is_entrance())
    }
}
