//! Integration tests for document traversal and statement ordering.

use kmb_compiler::{ErrorCode, Severity, compile};
use kmb_core::{
    argument::{ArgClass, Argument},
    document::{Document, Inputs, LayerNode, Mode, ModelNode, PlaceholderNode, UnitNode},
    identifier::NodeId,
};
use proptest::prelude::*;

fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::new(n)).collect()
}

fn lines(doc: &Document) -> Vec<String> {
    compile(doc)
        .expect("document should compile")
        .lines()
        .collect()
}

/// Input(1) -> Dense(2) -> Model(3), the smallest complete program.
fn minimal() -> Document {
    let mut doc = Document::new();
    doc.insert(
        LayerNode::new("1", "input_1", "Input")
            .entrance()
            .with_arg(Argument::new("shape", "(784,)", ArgClass::Seq))
            .with_output(&ids(&["2"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2", "dense_1", "Dense")
            .with_arg(Argument::new("units", "10", ArgClass::Num))
            .with_input(Inputs::parse("1"))
            .with_output(&ids(&["3"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3", "model")
            .with_inputs(&ids(&["2"]))
            .with_outputs(&ids(&["2"])),
    )
    .unwrap();
    doc
}

/// Two branches joined by a Concatenate layer, wrapped by one model.
fn diamond(entrance_order: &[&str]) -> Document {
    let mut doc = Document::new();
    for id in entrance_order {
        doc.insert(
            LayerNode::new(*id, format!("input_{id}"), "Input")
                .entrance()
                .with_arg(Argument::new("shape", "(8,)", ArgClass::Seq))
                .with_output(&ids(&["join", "model"])),
        )
        .unwrap();
    }
    doc.insert(
        LayerNode::new("join", "merged", "Concatenate")
            .with_input(Inputs::parse("a;b"))
            .with_output(&ids(&["model"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("model", "model")
            .with_inputs(&ids(&["a", "b"]))
            .with_outputs(&ids(&["join"])),
    )
    .unwrap();
    doc
}

#[test]
fn test_minimal_program_order() {
    let compilation = compile(&minimal()).unwrap();

    assert_eq!(
        compilation.lines().collect::<Vec<_>>(),
        vec![
            "input_1 = layers.Input(shape=(784,))",
            "dense_1 = layers.Dense(units=10)(input_1)",
            "model = models.Model(inputs=dense_1, outputs=dense_1)",
        ]
    );
    assert_eq!(compilation.endpoints(), &["model".to_string()]);
    assert!(compilation.warnings().is_empty());
    assert!(compilation.placeholders().is_empty());
}

#[test]
fn test_required_argument_names_layer_and_argument() {
    let mut doc = Document::new();
    doc.insert(
        LayerNode::new("1", "input_1", "Input")
            .entrance()
            .with_output(&ids(&["2"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2", "dense_1", "Dense")
            .with_arg(Argument::required("units", ArgClass::Num))
            .with_input(Inputs::parse("1"))
            .with_output(&ids(&["3"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3", "model")
            .with_inputs(&ids(&["2"]))
            .with_outputs(&ids(&["2"])),
    )
    .unwrap();

    let err = compile(&doc).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E300));
    assert!(err.diagnostic().message().contains("Dense:dense_1"));
    assert!(err.diagnostic().message().contains("`units`"));
}

#[test]
fn test_dangling_output_is_missing_connection() {
    let mut doc = minimal();
    doc.insert(
        LayerNode::new("4", "stray", "Input")
            .entrance()
            .with_output(&ids(&["nowhere"])),
    )
    .unwrap();

    let err = compile(&doc).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E200));
    assert!(err.diagnostic().message().contains("Input:stray"));
}

#[test]
fn test_unreferenced_layer_is_reported_unused() {
    let mut doc = minimal();
    doc.insert(
        LayerNode::new("4", "dense_2", "Dense").with_arg(Argument::new("units", "5", ArgClass::Num)),
    )
    .unwrap();

    let compilation = compile(&doc).unwrap();
    let warnings = compilation.warnings();

    assert_eq!(compilation.statements().len(), 3);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code(), Some(ErrorCode::W001));
    assert_eq!(warnings[0].severity(), Severity::Warning);
    assert!(warnings[0].message().contains("Dense:dense_2"));
}

#[test]
fn test_reference_to_unbuilt_layer_warns_first() {
    let mut doc = Document::new();
    doc.insert(
        LayerNode::new("1", "input_1", "Input")
            .entrance()
            .with_output(&ids(&["2", "3"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2", "wrapped", "Bidirectional")
            .with_mode(Mode::Ac)
            .with_arg(Argument::new("backward_layer", "4", ArgClass::Id))
            .with_input(Inputs::parse("1"))
            .with_output(&ids(&["3"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3", "model")
            .with_inputs(&ids(&["1"]))
            .with_outputs(&ids(&["2"])),
    )
    .unwrap();
    doc.insert(LayerNode::new("4", "backward", "LSTM")).unwrap();

    let compilation = compile(&doc).unwrap();
    let codes: Vec<_> = compilation.warnings().iter().map(|w| w.code()).collect();

    assert_eq!(
        compilation.lines().nth(1).unwrap(),
        "wrapped = layers.Bidirectional(backward_layer=backward)(input_1)"
    );
    assert_eq!(codes, vec![Some(ErrorCode::W004), Some(ErrorCode::W001)]);
}

#[test]
fn test_join_uses_declared_order() {
    let ab = lines(&diamond(&["a", "b"]));
    let ba = lines(&diamond(&["b", "a"]));

    let join_ab = ab.iter().find(|l| l.starts_with("merged")).unwrap();
    let join_ba = ba.iter().find(|l| l.starts_with("merged")).unwrap();

    assert_eq!(join_ab, "merged = layers.Concatenate()([input_a, input_b])");
    assert_eq!(join_ab, join_ba);
}

#[test]
fn test_model_emitted_once_after_all_roles() {
    let out = lines(&diamond(&["a", "b"]));

    let models: Vec<_> = out.iter().filter(|l| l.contains("models.Model")).collect();
    assert_eq!(models.len(), 1);
    assert_eq!(out.last().unwrap(), "model = models.Model(inputs=[input_a, input_b], outputs=merged)");
}

#[test]
fn test_multiple_models_returned_in_release_order() {
    let mut doc = minimal();
    doc.insert(
        LayerNode::new("1b", "aux_in", "Input")
            .entrance()
            .with_output(&ids(&["2b"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2b", "aux_out", "Dense")
            .with_input(Inputs::parse("1b"))
            .with_output(&ids(&["3b"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3b", "aux_model")
            .with_inputs(&ids(&["2b"]))
            .with_outputs(&ids(&["2b"])),
    )
    .unwrap();

    let compilation = compile(&doc).unwrap();
    assert_eq!(
        compilation.endpoints(),
        &["model".to_string(), "aux_model".to_string()]
    );
}

#[test]
fn test_callable_layer_inlined_into_accepting_layer() {
    let mut doc = Document::new();
    doc.insert(
        LayerNode::new("1", "seq_in", "Input")
            .entrance()
            .with_arg(Argument::new("shape", "(10, 16)", ArgClass::Seq))
            .with_output(&ids(&["2"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("inner", "inner", "Dense")
            .with_mode(Mode::Ca)
            .with_arg(Argument::new("units", "8", ArgClass::Num)),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2", "td", "TimeDistributed")
            .with_mode(Mode::Ac)
            .with_arg(Argument::new("layer", "inner", ArgClass::Id))
            .with_input(Inputs::parse("1"))
            .with_output(&ids(&["3"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3", "model")
            .with_inputs(&ids(&["2"]))
            .with_outputs(&ids(&["2"])),
    )
    .unwrap();

    let compilation = compile(&doc).unwrap();
    let out: Vec<_> = compilation.lines().collect();

    assert_eq!(out[1], "td = layers.TimeDistributed(layer=layers.Dense(units=8))(seq_in)");
    assert!(!out.iter().any(|l| l.starts_with("inner =")));
    assert!(compilation.warnings().is_empty());
}

#[test]
fn test_unreferenced_callable_layer_is_unused() {
    let mut doc = minimal();
    doc.insert(
        LayerNode::new("inner", "inner", "Dense")
            .with_mode(Mode::Ca)
            .with_arg(Argument::new("units", "8", ArgClass::Num)),
    )
    .unwrap();

    let compilation = compile(&doc).unwrap();
    assert_eq!(compilation.warnings().len(), 1);
    assert_eq!(compilation.warnings()[0].code(), Some(ErrorCode::W001));
}

#[test]
fn test_placeholders_and_units_collected() {
    let mut doc = Document::new();
    doc.insert(PlaceholderNode::new("ph", "hidden")).unwrap();
    doc.insert(
        UnitNode::new("init", "GlorotUniform", "initializers")
            .with_arg(Argument::new("seed", "42", ArgClass::Num)),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("1", "input_1", "Input")
            .entrance()
            .with_output(&ids(&["2"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("2", "dense_1", "Dense")
            .with_arg(Argument::new("units", "ph", ArgClass::Id))
            .with_arg(Argument::new("kernel_initializer", "init", ArgClass::Id))
            .with_input(Inputs::parse("1"))
            .with_output(&ids(&["3"])),
    )
    .unwrap();
    doc.insert(
        ModelNode::new("3", "model")
            .with_inputs(&ids(&["1"]))
            .with_outputs(&ids(&["2"])),
    )
    .unwrap();

    // input_1 has no edge to the model, so the model stays unreleased.
    let compilation = compile(&doc).unwrap();

    assert_eq!(compilation.placeholders(), &["hidden".to_string()]);
    assert_eq!(
        compilation.sources(),
        &["layers".to_string(), "initializers".to_string()]
    );
    assert_eq!(
        compilation.lines().nth(1).unwrap(),
        "dense_1 = layers.Dense(units=self.hidden, kernel_initializer=initializers.GlorotUniform(seed=42))(input_1)"
    );
    assert_eq!(compilation.warnings()[0].code(), Some(ErrorCode::W002));
}

#[test]
fn test_compilation_is_deterministic() {
    let doc = diamond(&["b", "a"]);
    let first = compile(&doc).unwrap();
    let second = compile(&doc).unwrap();

    assert_eq!(first.lines().collect::<Vec<_>>(), second.lines().collect::<Vec<_>>());
    assert_eq!(first.sources(), second.sources());
    assert_eq!(
        first.warnings().iter().map(ToString::to_string).collect::<Vec<_>>(),
        second.warnings().iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

#[test]
fn test_cycle_rejected_before_traversal() {
    let mut doc = minimal();
    doc.insert(
        LayerNode::new("x", "x", "Dense")
            .with_input(Inputs::parse("y"))
            .with_output(&ids(&["y"])),
    )
    .unwrap();
    doc.insert(
        LayerNode::new("y", "y", "Dense")
            .with_input(Inputs::parse("x"))
            .with_output(&ids(&["x"])),
    )
    .unwrap();

    assert_eq!(compile(&doc).unwrap_err().code(), Some(ErrorCode::E201));
}

proptest! {
    #[test]
    fn prop_join_independent_of_entrance_order(
        order in Just(vec!["a", "b", "c", "d"]).prop_shuffle()
    ) {
        let mut doc = Document::new();
        for id in &order {
            doc.insert(
                LayerNode::new(*id, format!("in_{id}"), "Input")
                    .entrance()
                    .with_output(&ids(&["join", "model"])),
            )
            .unwrap();
        }
        doc.insert(
            LayerNode::new("join", "merged", "Add")
                .with_input(Inputs::parse("a;b;c;d"))
                .with_output(&ids(&["model"])),
        )
        .unwrap();
        doc.insert(
            ModelNode::new("model", "model")
                .with_inputs(&ids(&["a", "b", "c", "d"]))
                .with_outputs(&ids(&["join"])),
        )
        .unwrap();

        let out = lines(&doc);

        prop_assert_eq!(out.len(), 6);
        prop_assert_eq!(&out[4], "merged = layers.Add()([in_a, in_b, in_c, in_d])");
        prop_assert!(out[5].starts_with("model = models.Model("));
    }
}
