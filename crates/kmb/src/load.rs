//! Loading documents from TOML.
//!
//! A document is a set of arrays of tables, one per entity kind:
//!
//! ```toml
//! [[layer]]
//! id = "1"
//! var = "input_1"
//! class = "Input"
//! entrance = true
//! output = ["2", "3"]
//!
//! [[layer.args]]
//! name = "shape"
//! value = "(784,)"
//! class = "seq"
//!
//! [[model]]
//! id = "3"
//! var = "model"
//! inputs = "1"
//! outputs = "2"
//! ```
//!
//! Entities are inserted in the order they appear in the text, whatever
//! their kind, so entrance and warning order follow the file.

use log::{debug, trace};
use serde::Deserialize;
use toml::Spanned;

use kmb_compiler::{Diagnostic, ErrorCode};
use kmb_core::{
    argument::{ArgClass, Argument, ITEM_SEPARATOR},
    document::{
        Document, DocumentError, Entity, Inputs, LayerNode, Mode, ModelNode, NoteNode,
        PlaceholderNode, UnitNode,
    },
    identifier::NodeId,
    span::Span,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    layer: Vec<Spanned<RawLayer>>,
    #[serde(default)]
    model: Vec<Spanned<RawModel>>,
    #[serde(default)]
    unit: Vec<Spanned<RawUnit>>,
    #[serde(default)]
    ph: Vec<Spanned<RawPlaceholder>>,
    #[serde(default)]
    note: Vec<Spanned<RawNote>>,
}

/// A scalar as written in the file; ids and values accept any of these.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl RawScalar {
    fn class(&self) -> ArgClass {
        match self {
            RawScalar::Text(_) => ArgClass::Str,
            RawScalar::Integer(_) | RawScalar::Float(_) => ArgClass::Num,
            RawScalar::Bool(_) => ArgClass::Bool,
        }
    }

    /// Renders the value the way it is written in generated source.
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(text) => text,
            RawScalar::Integer(value) => value.to_string(),
            RawScalar::Float(value) => format!("{value:?}"),
            RawScalar::Bool(true) => "True".to_string(),
            RawScalar::Bool(false) => "False".to_string(),
        }
    }
}

/// An id list: a separator-joined string, a single id, or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawIds {
    List(Vec<RawScalar>),
    One(RawScalar),
}

impl RawIds {
    fn into_raw(self) -> String {
        match self {
            RawIds::One(one) => one.into_text(),
            RawIds::List(list) => list
                .into_iter()
                .map(RawScalar::into_text)
                .collect::<Vec<_>>()
                .join(&ITEM_SEPARATOR.to_string()),
        }
    }

    fn into_ids(self) -> Vec<NodeId> {
        kmb_core::argument::parse_id_list(&self.into_raw())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArg {
    name: String,
    value: RawScalar,
    #[serde(default)]
    class: Option<ArgClass>,
}

impl From<RawArg> for Argument {
    fn from(arg: RawArg) -> Self {
        let class = arg.class.unwrap_or_else(|| arg.value.class());
        Argument::new(arg.name, arg.value.into_text(), class)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLayer {
    id: RawScalar,
    var: String,
    class: String,
    #[serde(default)]
    mode: Mode,
    #[serde(default)]
    entrance: bool,
    #[serde(default)]
    input: Option<RawIds>,
    #[serde(default)]
    output: Option<RawIds>,
    #[serde(default)]
    args: Vec<RawArg>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    id: RawScalar,
    var: String,
    #[serde(default)]
    inputs: Option<RawIds>,
    #[serde(default)]
    outputs: Option<RawIds>,
    #[serde(default)]
    args: Vec<RawArg>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnit {
    id: RawScalar,
    class: String,
    source: String,
    #[serde(default)]
    args: Vec<RawArg>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlaceholder {
    id: RawScalar,
    name: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNote {
    id: RawScalar,
    #[serde(default)]
    text: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

fn node_id(id: RawScalar) -> NodeId {
    NodeId::new(&id.into_text())
}

fn layer(raw: Spanned<RawLayer>) -> Entity {
    let span = Span::from(raw.span());
    let raw = raw.into_inner();

    let mut layer = LayerNode::new(node_id(raw.id), raw.var, raw.class)
        .with_mode(raw.mode)
        .with_input(Inputs::from_ids(
            raw.input.map(RawIds::into_ids).unwrap_or_default(),
        ))
        .with_output(&raw.output.map(RawIds::into_ids).unwrap_or_default())
        .with_position(raw.x, raw.y)
        .with_span(span);
    if raw.entrance {
        layer = layer.entrance();
    }
    for arg in raw.args {
        layer = layer.with_arg(arg.into());
    }
    layer.into()
}

fn model(raw: Spanned<RawModel>) -> Entity {
    let span = Span::from(raw.span());
    let raw = raw.into_inner();

    let mut model = ModelNode::new(node_id(raw.id), raw.var)
        .with_position(raw.x, raw.y)
        .with_span(span);
    for arg in raw.args {
        model = model.with_arg(arg.into());
    }
    if let Some(inputs) = raw.inputs {
        model = model.with_inputs(&inputs.into_ids());
    }
    if let Some(outputs) = raw.outputs {
        model = model.with_outputs(&outputs.into_ids());
    }
    model.into()
}

fn unit(raw: Spanned<RawUnit>) -> Entity {
    let span = Span::from(raw.span());
    let raw = raw.into_inner();

    let mut unit = UnitNode::new(node_id(raw.id), raw.class, raw.source)
        .with_position(raw.x, raw.y)
        .with_span(span);
    for arg in raw.args {
        unit = unit.with_arg(arg.into());
    }
    unit.into()
}

fn placeholder(raw: Spanned<RawPlaceholder>) -> Entity {
    let span = Span::from(raw.span());
    let raw = raw.into_inner();

    PlaceholderNode::new(node_id(raw.id), raw.name)
        .with_position(raw.x, raw.y)
        .with_span(span)
        .into()
}

fn note(raw: Spanned<RawNote>) -> Entity {
    let span = Span::from(raw.span());
    let raw = raw.into_inner();

    NoteNode::new(node_id(raw.id), raw.text)
        .with_position(raw.x, raw.y)
        .with_span(span)
        .into()
}

/// Parses a TOML document into a [`Document`].
///
/// # Errors
///
/// Returns an `E001` diagnostic if the text is not a valid document and an
/// `E002` diagnostic if two entities share an id.
pub fn parse(source: &str) -> Result<Document, Diagnostic> {
    let raw: RawDocument = toml::from_str(source).map_err(|err| {
        let span = err.span().map(Span::from);
        Diagnostic::error(format!("malformed document: {}", err.message().trim_end()))
            .with_code(ErrorCode::E001)
            .with_label_at(span, "invalid here")
    })?;

    let mut entities: Vec<Entity> = Vec::new();
    entities.extend(raw.layer.into_iter().map(layer));
    entities.extend(raw.model.into_iter().map(model));
    entities.extend(raw.unit.into_iter().map(unit));
    entities.extend(raw.ph.into_iter().map(placeholder));
    entities.extend(raw.note.into_iter().map(note));
    entities.sort_by_key(|entity| entity.span().map(|span| span.start()));

    let mut document = Document::new();
    for entity in entities {
        let span = entity.span();
        match document.insert(entity) {
            Ok(()) => {}
            Err(DocumentError::DuplicateId(id)) => {
                let first = document.get(id).and_then(Entity::span);
                return Err(Diagnostic::error(format!("duplicate entity id `{id}`"))
                    .with_code(ErrorCode::E002)
                    .with_label_at(span, "declared again here")
                    .with_secondary_label_at(first, "first declared here")
                    .with_help("every layer, model, unit, placeholder and note needs its own id"));
            }
            Err(err) => {
                return Err(Diagnostic::error(err.to_string())
                    .with_code(ErrorCode::E001)
                    .with_label_at(span, "invalid entity"));
            }
        }
        trace!(entities = document.len(); "Loaded entity");
    }

    debug!(entities = document.len(); "Document loaded");
    Ok(document)
}
