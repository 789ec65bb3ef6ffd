mod common;

use common::fixtures::{order, people};
use common::{TestResult, entries_at, run, warned_about};
use jsonmorph::{Engine, EngineConfig, LogLevel, ScriptError};
use serde_json::json;

#[test]
fn test_order_enrichment_end_to_end() -> TestResult {
    let output = run(
        json!([
            {"op": "put", "path": "$.customer.name", "value": "=concat(@.first,' ',@.last)"},
            {"op": "set", "path": "$.customer.email", "value": "=lower(trim(@.email))"},
            {"op": "add", "path": "$.lines[*].key", "value": "=concat(@.sku,'-',@.qty)"},
            {"op": "add", "path": "$.tags", "value": "shipped"},
            {"op": "copy", "fromPath": "$.id", "toPath": "$.meta.source"},
            {"op": "remove", "path": "$.lines[?(@.qty < 2)]"}
        ]),
        order(),
    )?;

    assert!(output.success);
    assert_eq!(
        output.document,
        json!({
            "id": "A-1001",
            "customer": {
                "first": "Ada",
                "last": "Lovelace",
                "email": "ada@example.com",
                "name": "Ada Lovelace"
            },
            "lines": [
                {"sku": "p-1", "qty": 2, "price": 10.5, "key": "p-1-2"},
                {"sku": "p-3", "qty": 5, "price": 1.25, "key": "p-3-5"}
            ],
            "tags": ["new", "shipped"],
            "meta": {"source": "A-1001"}
        })
    );
    assert!(entries_at(&output, LogLevel::Warning).is_empty());
    Ok(())
}

#[test]
fn test_unknown_command_fails_the_script_once() -> TestResult {
    let output = run(
        json!([
            {"op": "bogus", "path": "$.id"},
            {"op": "put", "path": "$.seen", "value": true}
        ]),
        order(),
    )?;

    assert!(!output.success);
    assert_eq!(output.document["seen"], json!(true));
    let errors = entries_at(&output, LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("bogus"));
    Ok(())
}

#[test]
fn test_policies_on_existing_and_missing_properties() -> TestResult {
    let output = run(
        json!([
            {"op": "add", "path": "$.id", "value": "other"},
            {"op": "set", "path": "$.missing", "value": 1},
            {"op": "put", "path": "$.customer.first", "value": "Augusta"},
            {"op": "add", "path": "$.tags", "value": ["a", "b"]}
        ]),
        order(),
    )?;

    assert!(!output.success);
    assert_eq!(output.document["id"], json!("A-1001"));
    assert!(output.document.get("missing").is_none());
    assert_eq!(output.document["customer"]["first"], json!("Augusta"));
    assert_eq!(output.document["tags"], json!(["new", ["a", "b"]]));
    assert!(warned_about(&output, "$.id"));
    assert!(warned_about(&output, "$.missing"));
    Ok(())
}

#[test]
fn test_search_address_updates_every_match() -> TestResult {
    let output = run(json!([{"op": "set", "path": "$..price", "value": 0}]), order())?;
    assert!(output.success);
    for line in output.document["lines"].as_array().into_iter().flatten() {
        assert_eq!(line["price"], json!(0));
    }
    Ok(())
}

#[test]
fn test_aligned_move_keeps_records_apart() -> TestResult {
    let output = run(
        json!([{"op": "move", "fromPath": "$.people[*].first", "toPath": "$.people[*].name.first"}]),
        people(3),
    )?;

    assert!(output.success);
    for (i, person) in output.document["people"].as_array().into_iter().flatten().enumerate() {
        assert_eq!(person["name"]["first"], json!(format!("First{}", i)));
        assert!(person.get("first").is_none());
        assert_eq!(person["last"], json!(format!("Last{}", i)));
    }
    Ok(())
}

#[test]
fn test_move_into_root_unwraps_an_envelope() -> TestResult {
    let output = run(
        json!([{"op": "move", "fromPath": "$.payload", "toPath": "$"}]),
        json!({"envelope": {"v": 1}, "payload": {"id": 9, "items": []}}),
    )?;
    assert!(output.success);
    assert_eq!(output.document, json!({"id": 9, "items": []}));
    Ok(())
}

#[test]
fn test_literal_address_versus_plain_string() -> TestResult {
    let output = run(
        json!([
            {"op": "put", "path": "$.customerId", "value": "$.id"},
            {"op": "put", "path": "$.quoted", "value": "=concat('$.id')"}
        ]),
        order(),
    )?;
    assert!(output.success);
    assert_eq!(output.document["customerId"], json!("A-1001"));
    assert_eq!(output.document["quoted"], json!("$.id"));
    Ok(())
}

#[test]
fn test_missing_fields_are_validation_failures() -> TestResult {
    let output = run(
        json!([
            {"op": "add", "value": 1},
            {"op": "put", "path": "$.x"},
            {"op": "copy", "fromPath": "$.id"},
            {"op": "remove"}
        ]),
        order(),
    )?;
    assert!(!output.success);
    assert_eq!(output.document, order());
    assert_eq!(entries_at(&output, LogLevel::Warning).len(), 4);
    Ok(())
}

#[test]
fn test_halt_on_failure_from_config() -> TestResult {
    common::init_logger();
    let config = EngineConfig::from_json(r#"{"haltOnFailure": true}"#)?;
    let engine = Engine::builder().with_config(config).build();
    let output = engine.run(
        &json!([
            {"op": "remove", "path": "$.nothing"},
            {"op": "remove", "path": "$.id"}
        ]),
        order(),
    )?;
    assert!(!output.success);
    assert_eq!(output.document["id"], json!("A-1001"));
    Ok(())
}

#[test]
fn test_expression_depth_limit_from_config() -> TestResult {
    common::init_logger();
    let config = EngineConfig::from_json(r#"{"limits": {"maxExpressionDepth": 1}}"#)?;
    let engine = Engine::builder().with_config(config).build();
    let output = engine.run(
        &json!([{"op": "put", "path": "$.v", "value": "=upper(lower('a'))"}]),
        json!({}),
    )?;
    assert!(output.success);
    assert_eq!(output.document["v"], json!("LOWER('A')"));
    assert_eq!(entries_at(&output, LogLevel::Warning).len(), 1);
    Ok(())
}

#[test]
fn test_script_must_be_an_array() {
    let result = run(json!({"op": "add", "path": "$.a", "value": 1}), json!({}));
    assert!(matches!(result, Err(ScriptError::NotAnArray(_))));
}
