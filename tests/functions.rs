/*
 * Function Tests
 *
 * Canonical calls: declaration order, defaults substituted exactly once,
 * exact arity, curried native functions and callbacks.
 */

mod cases;

use boundary::{
    BoundaryError, Constructor, Field, FnValue, FunctionSignature, Literal, Parameter, TypeId,
    Value,
};
use cases::{Case, error_codes, plan};
use pretty_assertions::assert_eq;

/// Native function returning its arguments as an array.
fn echo(arity: usize) -> FnValue {
    FnValue::new(arity, |args| Ok(Value::Array(args)))
}

#[test]
fn default_is_substituted_only_when_absent() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(
                vec![
                    Parameter::optional("a", Some(Literal::Int(3)), TypeId::INT),
                    Parameter::positional(TypeId::INT),
                ],
                TypeId::UNIT,
            ),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "f");

    assert_eq!(
        plan.call(&echo(2), vec![Value::Absent, Value::Int(5)]),
        Ok(Value::array([Value::Int(3), Value::Int(5)]))
    );
    assert_eq!(
        plan.call(&echo(2), vec![Value::Int(10), Value::Int(5)]),
        Ok(Value::array([Value::Int(10), Value::Int(5)]))
    );
    // Supplying the default's value explicitly is still a supplied value.
    assert_eq!(
        plan.call(&echo(2), vec![Value::Int(3), Value::Int(5)]),
        Ok(Value::array([Value::Int(3), Value::Int(5)]))
    );
}

#[test]
fn variant_default_is_converted_like_a_supplied_value() {
    let mut case = Case::new();
    case.module("Days", |a, m| {
        let weekday = a.named("Days", "weekday", vec![]);
        m.declare_type(
            "weekday",
            a.variant(vec![Constructor::nullary("Monday"), Constructor::nullary("Tuesday")]),
        );
        m.export_function(
            "schedule",
            FunctionSignature::new(
                vec![
                    Parameter::optional("day", Some(Literal::String("Tuesday".into())), weekday),
                    Parameter::positional(TypeId::INT),
                ],
                TypeId::UNIT,
            ),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "Days", "schedule");

    let expected = Value::array([Value::Int(1), Value::Int(5)]);
    assert_eq!(
        plan.call(&echo(2), vec![Value::str("Tuesday"), Value::Int(5)]),
        Ok(expected.clone())
    );
    assert_eq!(
        plan.call(&echo(2), vec![Value::Absent, Value::Int(5)]),
        Ok(expected)
    );
}

#[test]
fn default_must_be_a_value_of_the_parameter_type() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let point = a.record(vec![Field::new("x", TypeId::INT), Field::new("y", TypeId::INT)]);
        let weekday = a.variant(vec![Constructor::nullary("Monday")]);
        let unary = |default: Literal, ty: TypeId| {
            FunctionSignature::new(
                vec![
                    Parameter::optional("a", Some(default), ty),
                    Parameter::positional(TypeId::INT),
                ],
                TypeId::UNIT,
            )
        };
        m.export_function("wrong_scalar", unary(Literal::String("3".into()), TypeId::INT));
        m.export_function("record", unary(Literal::Int(0), point));
        m.export_function("unknown_tag", unary(Literal::String("Sunday".into()), weekday));
        m.export_function("fine", unary(Literal::String("Monday".into()), weekday));
    });
    let report = case.analyze();

    for name in ["wrong_scalar", "record", "unknown_tag"] {
        assert_eq!(error_codes(&report, "M", name), vec!["E003"], "{}", name);
    }
    assert!(report.plan("M", "fine").is_some());
}

#[test]
fn native_default_is_left_to_the_callee() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(
                vec![Parameter::optional("offset", None, TypeId::INT)
                    .with_native_default(Literal::Int(1))],
                TypeId::UNIT,
            ),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "f");
    assert_eq!(
        plan.call(&echo(1), vec![Value::Absent]),
        Ok(Value::array([Value::Absent]))
    );
}

#[test]
fn default_on_both_sides_is_ambiguous() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(
                vec![Parameter::optional("offset", Some(Literal::Int(1)), TypeId::INT)
                    .with_native_default(Literal::Int(1))],
                TypeId::UNIT,
            ),
        );
    });
    let report = case.analyze();
    assert_eq!(error_codes(&report, "M", "f"), vec!["E005"]);
}

#[test]
fn missing_argument_is_an_arity_error() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(vec![Parameter::positional(TypeId::INT); 4], TypeId::UNIT),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "f");
    assert_eq!(
        plan.call(&echo(4), vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Err(BoundaryError::Arity {
            expected: 4,
            found: 3
        })
    );
}

#[test]
fn curried_native_function_is_saturated() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "digits",
            FunctionSignature::new(
                vec![
                    Parameter::positional(TypeId::INT),
                    Parameter::named("tens", TypeId::INT),
                    Parameter::named("ones", TypeId::INT),
                ],
                TypeId::INT,
            ),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "digits");

    // a => (b, c) => a * 100 + b * 10 + c
    let native = FnValue::new(1, |args| {
        let Value::Int(a) = args[0] else {
            return Err(BoundaryError::shape("int", args[0].kind_name()));
        };
        Ok(Value::Function(FnValue::new(2, move |rest| {
            match (&rest[0], &rest[1]) {
                (Value::Int(b), Value::Int(c)) => Ok(Value::Int(a * 100 + b * 10 + c)),
                _ => Err(BoundaryError::shape("int", "other")),
            }
        })))
    });
    assert_eq!(
        plan.call(&native, vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Ok(Value::Int(123))
    );
}

#[test]
fn native_partial_application_is_rejected() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(vec![Parameter::positional(TypeId::INT); 2], TypeId::INT),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "f");

    // A native function that wants three arguments in total.
    let native = FnValue::new(1, |_| Ok(Value::Function(FnValue::new(2, |_| Ok(Value::Unit)))));
    let result = plan.call(&native, vec![Value::Int(1), Value::Int(2)]);
    assert!(matches!(result, Err(BoundaryError::Arity { .. })));
}

#[test]
fn callback_receives_host_records() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let point = a.record(vec![Field::new("x", TypeId::INT)]);
        let callback = a.function(FunctionSignature::new(
            vec![Parameter::positional(point)],
            TypeId::INT,
        ));
        m.export_function(
            "apply",
            FunctionSignature::new(
                vec![Parameter::positional(callback), Parameter::positional(point)],
                TypeId::INT,
            ),
        );
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "apply");

    let native = FnValue::new(2, |args| match &args[0] {
        Value::Function(f) => f.invoke(vec![args[1].clone()]),
        other => Err(BoundaryError::shape("function", other.kind_name())),
    });
    let host_callback = FnValue::new(1, |args| {
        Ok(args[0].get("x").cloned().unwrap_or(Value::Null))
    });

    let result = plan.call(
        &native,
        vec![
            Value::Function(host_callback),
            Value::object([("x", Value::Int(4))]),
        ],
    );
    assert_eq!(result, Ok(Value::Int(4)));
}

#[test]
fn unary_identity_function_needs_no_shim() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "id",
            FunctionSignature::new(vec![Parameter::positional(TypeId::INT)], TypeId::INT),
        );
        m.export_function("now", FunctionSignature::new(vec![], TypeId::FLOAT));
    });
    let report = case.analyze();
    assert!(plan(&report, "M", "id").is_identity());

    let now = plan(&report, "M", "now");
    assert!(now.is_identity());
    let clock = FnValue::new(0, |_| Ok(Value::Float(1.5)));
    assert_eq!(now.call(&clock, vec![]), Ok(Value::Float(1.5)));
}

#[test]
fn function_plans_serialize_for_emitters() {
    let mut case = Case::new();
    case.module("M", |_, m| {
        m.export_function(
            "f",
            FunctionSignature::new(
                vec![
                    Parameter::named("day", TypeId::STRING),
                    Parameter::optional("offset", Some(Literal::Int(1)), TypeId::INT),
                ],
                TypeId::UNIT,
            ),
        );
    });
    let report = case.analyze();
    let json = serde_json::to_value(plan(&report, "M", "f")).unwrap();
    let slots = &json["kind"]["Function"]["call"]["slots"];
    assert_eq!(slots[1]["label"], "offset");
    assert!(slots[1]["default"]["Shim"].is_object());
}
