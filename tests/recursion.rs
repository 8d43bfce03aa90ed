/*
 * Recursive Type Tests
 *
 * Recursive declarations plan to fixpoint converters that unfold lazily,
 * one level of the value at a time.
 */

mod cases;

use boundary::{Constructor, Field, FunctionSignature, Parameter, TypeId, Value};
use cases::{Case, error_codes, plan};
use pretty_assertions::assert_eq;

fn node(label: &str, children: Vec<Value>) -> Value {
    Value::object([("label", Value::str(label)), ("children", Value::array(children))])
}

fn native_node(label: &str, children: Vec<Value>) -> Value {
    Value::array([Value::str(label), Value::array(children)])
}

fn tree_case() -> Case {
    let mut case = Case::new();
    case.module("Tree", |a, m| {
        let tree = a.named("Tree", "t", vec![]);
        m.declare_type(
            "t",
            a.record(vec![
                Field::new("label", TypeId::STRING),
                Field::new("children", a.array(tree)),
            ]),
        );
        m.export_value("root", tree);
        m.export_function(
            "depth",
            FunctionSignature::new(vec![Parameter::positional(tree)], TypeId::INT),
        );
    });
    case
}

#[test]
fn tree_round_trips() {
    let report = tree_case().analyze();
    let plan = plan(&report, "Tree", "root");
    assert_eq!(plan.fixpoints.len(), 1);

    let host = node("a", vec![node("b", vec![]), node("c", vec![node("d", vec![])])]);
    let native = native_node(
        "a",
        vec![
            native_node("b", vec![]),
            native_node("c", vec![native_node("d", vec![])]),
        ],
    );
    assert_eq!(plan.to_native(host.clone()).unwrap(), native);
    assert_eq!(plan.to_host(native).unwrap(), host);
}

#[test]
fn function_plans_carry_their_fixpoints() {
    let report = tree_case().analyze();
    let plan = plan(&report, "Tree", "depth");
    assert_eq!(plan.fixpoints.len(), 1);

    // Counts levels of the positional tree.
    fn depth(value: &Value) -> i64 {
        match value {
            Value::Array(items) => match &items[1] {
                Value::Array(children) => 1 + children.iter().map(depth).max().unwrap_or(0),
                _ => 0,
            },
            _ => 0,
        }
    }
    let native = boundary::FnValue::new(1, |args| Ok(Value::Int(depth(&args[0]))));
    let host = node("a", vec![node("b", vec![node("c", vec![])])]);
    assert_eq!(plan.call(&native, vec![host]), Ok(Value::Int(3)));
}

#[test]
fn mutual_recursion_across_modules() {
    let mut case = Case::new();
    case.module("Expr", |a, m| {
        let stmt = a.named("Stmt", "t", vec![]);
        m.declare_type(
            "t",
            a.variant(vec![
                Constructor::with_payload("Lit", TypeId::INT),
                Constructor::with_payload("Block", a.array(stmt)),
            ]),
        );
        m.export_value("program", a.named("Expr", "t", vec![]));
    });
    case.module("Stmt", |a, m| {
        let expr = a.named("Expr", "t", vec![]);
        m.declare_type(
            "t",
            a.variant(vec![
                Constructor::with_payload("Eval", expr),
                Constructor::nullary("Skip"),
            ]),
        );
        m.export_value("statement", a.named("Stmt", "t", vec![]));
    });
    let report = case.analyze();
    assert!(!report.has_errors());

    let plan = plan(&report, "Expr", "program");
    let lit = |n| Value::object([("tag", Value::str("Lit")), ("value", Value::Int(n))]);
    let host = Value::object([
        ("tag", Value::str("Block")),
        (
            "value",
            Value::array([
                Value::object([("tag", Value::str("Eval")), ("value", lit(1))]),
                Value::str("Skip"),
            ]),
        ),
    ]);
    let native = Value::Block {
        tag: 1,
        fields: vec![Value::array([
            Value::Block {
                tag: 0,
                fields: vec![Value::Block {
                    tag: 0,
                    fields: vec![Value::Int(1)],
                }],
            },
            Value::Int(0),
        ])],
    };
    assert_eq!(plan.to_native(host.clone()).unwrap(), native);
    assert_eq!(plan.to_host(native).unwrap(), host);
}

#[test]
fn recursion_without_conversion_is_identity() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let list = a.named("M", "intlist", vec![]);
        m.declare_type("intlist", a.option(a.tuple(vec![TypeId::INT, list])));
        m.export_value("value", list);
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "value");
    assert!(plan.is_identity());
    assert!(plan.fixpoints.is_empty());
}

#[test]
fn direct_self_containment_is_cyclic() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let t = a.named("M", "t", vec![]);
        m.declare_type(
            "t",
            a.record(vec![Field::new("x", TypeId::INT), Field::new("next", t)]),
        );
        m.export_value("value", t);
        m.export_value("fine", TypeId::INT);
    });
    let report = case.analyze();
    assert_eq!(error_codes(&report, "M", "value"), vec!["E002"]);
    assert!(report.plan("M", "fine").is_some());
}

#[test]
fn optional_self_field_is_deferred() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let t = a.named("M", "chain", vec![]);
        m.declare_type(
            "chain",
            a.record(vec![
                Field::new("x", TypeId::INT),
                Field::new("next", t).optional(),
            ]),
        );
        m.export_value("value", t);
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "value");

    let host = Value::object([
        ("x", Value::Int(1)),
        ("next", Value::object([("x", Value::Int(2))])),
    ]);
    let native = Value::array([
        Value::Int(1),
        Value::array([Value::Int(2), Value::Absent]),
    ]);
    assert_eq!(plan.to_native(host.clone()).unwrap(), native);
    assert_eq!(plan.to_host(native).unwrap(), host);
}
