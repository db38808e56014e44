use std::collections::BTreeMap;

use abis_model::Value;
use abis_validate::{CompareOp, Expr, ExprError, ExprValue};
use serde_json::json;

fn make_scope(pairs: &[(&str, ExprValue)]) -> BTreeMap<String, ExprValue> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn eval(source: &str, scope: &BTreeMap<String, ExprValue>) -> ExprValue {
    let expr = Expr::parse(source).expect("valid formula");
    expr.evaluate(&|name: &str| scope.get(name).cloned().unwrap_or(ExprValue::Null))
}

fn truthy(source: &str, scope: &BTreeMap<String, ExprValue>) -> bool {
    eval(source, scope).is_truthy()
}

#[test]
fn parses_precedence_of_or_over_and() {
    let expr = Expr::parse("a or b and c").expect("parse");
    let Expr::Or(left, right) = expr else {
        panic!("expected or at the root");
    };
    assert_eq!(*left, Expr::Name("a".to_string()));
    assert!(matches!(*right, Expr::And(_, _)));
}

#[test]
fn comparisons_and_boolean_operators() {
    let scope = make_scope(&[
        ("count", ExprValue::Number(3.0)),
        ("status", ExprValue::String("present".to_string())),
    ]);
    assert!(truthy("count > 2 and status == 'present'", &scope));
    assert!(truthy("count <= 3", &scope));
    assert!(!truthy("count < -1", &scope));
    assert!(truthy("not (count != 3)", &scope));
    assert!(truthy("status != \"absent\" or false", &scope));
    assert!(!truthy("count >= 'three'", &scope));
}

#[test]
fn missing_names_are_null() {
    let scope = make_scope(&[]);
    assert_eq!(eval("unknown", &scope), ExprValue::Null);
    assert!(truthy("unknown == null", &scope));
    assert!(!truthy("unknown > 0", &scope));
    assert!(!truthy("unknown < 0", &scope));
}

#[test]
fn membership_against_lists_and_side_inputs() {
    let scope = make_scope(&[
        ("basis", ExprValue::String("HumanObservation".to_string())),
        ("allowed", ExprValue::from_json(&json!(["HumanObservation", "MachineObservation"]))),
    ]);
    assert!(truthy("basis in allowed", &scope));
    assert!(truthy("basis in ['HumanObservation', 'Other',]", &scope));
    assert!(truthy("'Specimen' not in allowed", &scope));
    assert!(!truthy("basis in []", &scope));
}

#[test]
fn truthiness_of_values() {
    assert!(!ExprValue::Null.is_truthy());
    assert!(!ExprValue::Number(0.0).is_truthy());
    assert!(ExprValue::Number(-1.5).is_truthy());
    assert!(!ExprValue::String(String::new()).is_truthy());
    assert!(!ExprValue::List(Vec::new()).is_truthy());
    assert!(ExprValue::Bool(true).is_truthy());
}

#[test]
fn converts_cell_values() {
    assert_eq!(ExprValue::from_value(&Value::Integer(4)), ExprValue::Number(4.0));
    assert_eq!(ExprValue::from_value(&Value::Null), ExprValue::Null);
    assert_eq!(
        ExprValue::from_value(&Value::List(vec!["a".to_string()])),
        ExprValue::List(vec![ExprValue::String("a".to_string())])
    );
    assert_eq!(ExprValue::from_json(&json!({"a": 1})), ExprValue::Null);
}

#[test]
fn compare_op_is_exposed_in_the_tree() {
    let expr = Expr::parse("a >= 1").expect("parse");
    assert!(matches!(expr, Expr::Compare(CompareOp::Ge, _, _)));
}

#[test]
fn rejects_malformed_formulas_with_positions() {
    let cases = [
        ("", 0),
        ("a ==", 4),
        ("a = 1", 2),
        ("(a and b", 0),
        ("'open", 0),
        ("a b", 2),
        ("a.b", 1),
        ("- x", 0),
        ("[1, 2", 0),
        ("basis in 'HumanObservation'", 9),
        ("a not in 3", 9),
    ];
    for (source, position) in cases {
        let error: ExprError = Expr::parse(source).expect_err(source);
        assert_eq!(error.position, position, "{source}: {error}");
    }
}

#[test]
fn error_display_includes_position() {
    let error = Expr::parse("a and").expect_err("incomplete");
    insta::assert_snapshot!(error.to_string(), @"unexpected end of formula at position 5");
}

#[test]
fn membership_needs_a_list_or_a_name() {
    let error = Expr::parse("basis in 'HumanObservation'").expect_err("string target");
    insta::assert_snapshot!(error.to_string(), @"'in' needs a list or a name on its right-hand side at position 9");

    let scope = make_scope(&[
        ("basis", ExprValue::String("HumanObservation".to_string())),
        ("kind", ExprValue::String("HumanObservation".to_string())),
    ]);
    assert!(!truthy("basis in kind", &scope));
}

#[test]
fn rejects_deep_nesting() {
    let nested = |open: &str, close: &str, levels: usize| {
        format!("{}1{}", open.repeat(levels), close.repeat(levels))
    };

    assert!(Expr::parse(&nested("(", ")", 64)).is_ok());
    for source in [
        nested("(", ")", 65),
        nested("[", "]", 1000),
        nested("not ", "", 1000),
        format!("a in {}", nested("[", "]", 100)),
    ] {
        let error = Expr::parse(&source).expect_err("too deep");
        assert_eq!(error.reason, "formula is nested too deeply");
    }

    let error = Expr::parse(&nested("(", ")", 65)).expect_err("too deep");
    assert_eq!(error.position, 64);
}

#[test]
fn rejects_oversized_formulas_without_recursing() {
    let parens = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    let error = Expr::parse(&parens).expect_err("too long");
    assert_eq!(error.reason, "formula is too long");

    let chain = vec!["a"; 100_000].join(" or ");
    let error = Expr::parse(&chain).expect_err("too long");
    assert_eq!(error.reason, "formula is too long");
}
