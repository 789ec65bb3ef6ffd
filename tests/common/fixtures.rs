use serde_json::{Value, json};

/// A small order document used across the integration tests.
pub fn order() -> Value {
    json!({
        "id": "A-1001",
        "customer": {"first": "Ada", "last": "Lovelace", "email": " ADA@EXAMPLE.COM "},
        "lines": [
            {"sku": "p-1", "qty": 2, "price": 10.5},
            {"sku": "p-2", "qty": 1, "price": 4},
            {"sku": "p-3", "qty": 5, "price": 1.25}
        ],
        "tags": ["new"]
    })
}

/// `count` records shaped like a CRM export.
pub fn people(count: usize) -> Value {
    let people: Vec<Value> = (0..count)
        .map(|i| json!({"first": format!("First{}", i), "last": format!("Last{}", i), "age": i}))
        .collect();
    json!({ "people": people })
}
