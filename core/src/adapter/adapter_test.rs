use super::*;
use boundary_types::{Parameter, TypeId};
use pretty_assertions::assert_eq;

fn signature(params: Vec<Parameter>) -> FunctionSignature {
    FunctionSignature::new(params, TypeId::UNIT)
}

#[test]
fn test_positional_and_named_keep_order() {
    let call = adapt(&signature(vec![
        Parameter::positional(TypeId::INT),
        Parameter::named("day", TypeId::STRING),
    ]))
    .unwrap();

    assert_eq!(call.arity(), 2);
    assert_eq!(call.order, vec![0, 1]);
    assert_eq!(call.slots[1].label.as_deref(), Some("day"));
    assert!(!call.has_shim_defaults());
}

#[test]
fn test_shim_default_is_substituted_only_when_absent() {
    let call = adapt(&signature(vec![
        Parameter::named("day", TypeId::STRING),
        Parameter::optional("offset", Some(Literal::Int(1)), TypeId::INT),
    ]))
    .unwrap();
    assert_eq!(call.slots[1].default, DefaultPlacement::Shim(Literal::Int(1)));

    let filled = call.assemble(vec![Value::str("mon"), Value::Absent]).unwrap();
    assert_eq!(filled, vec![Value::str("mon"), Value::Int(1)]);

    let explicit = call.assemble(vec![Value::str("mon"), Value::Int(3)]).unwrap();
    assert_eq!(explicit, vec![Value::str("mon"), Value::Int(3)]);
}

#[test]
fn test_native_default_passes_absence_through() {
    let call = adapt(&signature(vec![
        Parameter::optional("offset", None, TypeId::INT).with_native_default(Literal::Int(1)),
    ]))
    .unwrap();
    assert_eq!(call.slots[0].default, DefaultPlacement::Native(Literal::Int(1)));
    assert_eq!(call.assemble(vec![Value::Absent]).unwrap(), vec![Value::Absent]);
}

#[test]
fn test_optional_without_default() {
    let call = adapt(&signature(vec![Parameter::optional("x", None, TypeId::INT)])).unwrap();
    assert_eq!(call.slots[0].default, DefaultPlacement::None);
    assert!(call.slots[0].optional);
}

#[test]
fn test_default_on_both_sides_is_ambiguous() {
    let result = adapt(&signature(vec![
        Parameter::optional("offset", Some(Literal::Int(1)), TypeId::INT)
            .with_native_default(Literal::Int(2)),
    ]));
    assert!(matches!(
        result,
        Err(BoundaryError::AmbiguousDefault { ref label, .. }) if label == "offset"
    ));
}

#[test]
fn test_default_on_required_parameter_is_ambiguous() {
    let result = adapt(&signature(vec![
        Parameter::positional(TypeId::INT).with_native_default(Literal::Int(0)),
    ]));
    assert!(matches!(
        result,
        Err(BoundaryError::AmbiguousDefault { ref label, .. }) if label == "#0"
    ));
}

#[test]
fn test_assemble_rejects_wrong_argument_count() {
    let call = adapt(&signature(vec![
        Parameter::positional(TypeId::INT),
        Parameter::positional(TypeId::INT),
    ]))
    .unwrap();

    assert_eq!(
        call.assemble(vec![Value::Int(1)]),
        Err(BoundaryError::Arity {
            expected: 2,
            found: 1
        })
    );
    assert_eq!(
        call.assemble(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Err(BoundaryError::Arity {
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn test_zero_parameters() {
    let call = adapt(&signature(vec![])).unwrap();
    assert_eq!(call.arity(), 0);
    assert_eq!(call.assemble(vec![]).unwrap(), Vec::<Value>::new());
}

#[test]
fn test_arity_only_adapter_has_no_defaults() {
    let call = adapt(&signature(vec![Parameter::optional(
        "offset",
        Some(Literal::Int(1)),
        TypeId::INT,
    )]))
    .unwrap();
    assert_eq!(call.adapter().defaults, vec![Some(Literal::Int(1))]);
    assert_eq!(call.arity_only().defaults, vec![None]);
}
