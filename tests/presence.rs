/*
 * Presence Tests
 *
 * Absence by omission (option, optional fields) and the explicit null
 * sentinel (nullable) must never be confused with each other.
 */

mod cases;

use boundary::{Field, Severity, TypeId, Value};
use cases::{Case, error_codes, plan};
use pretty_assertions::assert_eq;

conversion_case! {
    name: option_of_identity_keeps_absent,
    setup: |a, m| {
        m.export_value("value", a.option(TypeId::INT));
    },
    host: Value::Absent,
    native: Value::Absent,
}

conversion_case! {
    name: option_of_record_converts_present_value,
    setup: |a, m| {
        let point = a.record(vec![Field::new("x", TypeId::INT)]);
        m.export_value("value", a.option(point));
    },
    host: Value::object([("x", Value::Int(1))]),
    native: Value::array([Value::Int(1)]),
}

conversion_case! {
    name: nullable_null_survives,
    setup: |a, m| {
        let point = a.record(vec![Field::new("x", TypeId::INT)]);
        m.export_value("value", a.nullable(point));
    },
    host: Value::Null,
    native: Value::Null,
}

#[test]
fn absent_and_null_stay_distinct_in_one_record() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        let point = a.record(vec![Field::new("x", TypeId::INT)]);
        let rec = a.record(vec![
            Field::new("maybe", a.option(point)),
            Field::new("orNull", a.nullable(point)),
        ]);
        m.export_value("value", rec);
    });
    let report = case.analyze();
    let plan = plan(&report, "M", "value");

    let host = Value::object([("orNull", Value::Null)]);
    let native = plan.to_native(host.clone()).unwrap();
    assert_eq!(native, Value::array([Value::Absent, Value::Null]));
    assert_eq!(plan.to_host(native).unwrap(), host);
}

#[test]
fn nullable_is_never_identity() {
    let mut case = Case::new();
    case.module("M", |a, m| {
        m.export_value("value", a.nullable(TypeId::STRING));
    });
    let report = case.analyze();
    assert!(!plan(&report, "M", "value").is_identity());
}

#[test]
fn option_of_option_is_reported_with_its_field() {
    let mut case = Case::new();
    case.module("Records", |a, m| {
        let coord = a.record(vec![
            Field::new("x", TypeId::FLOAT),
            Field::new("z", a.option(TypeId::FLOAT)).optional(),
        ]);
        m.declare_type("coord", coord);
        m.export_value("origin", a.named("Records", "coord", vec![]));
    });
    let report = case.analyze();

    assert_eq!(error_codes(&report, "Records", "origin"), vec!["E003"]);
    let outcome = report.outcome("Records", "origin").unwrap();
    let diagnostic = &outcome.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(
        diagnostic.related,
        vec![
            "while expanding type 'Records.coord'".to_string(),
            "in field 'z'".to_string()
        ]
    );
}
