use super::*;
use serde_json::json;

fn request(body: Value) -> CreateItemRequest {
    serde_json::from_value(body).expect("request")
}

#[test]
fn coerces_numeric_strings() {
    let item = request(json!({ "id": "4", "nombre": "bolt", "cantidad": " 12 ", "precio": "0.5" }))
        .into_item()
        .expect("item");
    assert_eq!(item.id, ItemId(4));
    assert_eq!(item.quantity, 12.0);
    assert_eq!(item.price, Some(0.5));
    assert!(item.category.is_none());
}

#[test]
fn numeric_name_and_category_become_text() {
    let item = request(json!({ "id": 1, "nombre": 42, "cantidad": 1, "categoria": 7 }))
        .into_item()
        .expect("item");
    assert_eq!(item.name, "42");
    assert_eq!(item.category.as_deref(), Some("7"));
}

#[test]
fn rejects_fractional_or_missing_id() {
    assert!(request(json!({ "id": 1.5, "nombre": "x", "cantidad": 1 }))
        .into_item()
        .is_err());
    assert!(request(json!({ "nombre": "x", "cantidad": 1 }))
        .into_item()
        .is_err());
    assert!(request(json!({ "id": "abc", "nombre": "x", "cantidad": 1 }))
        .into_item()
        .is_err());
}

#[test]
fn non_numeric_quantity_becomes_nan() {
    let item = request(json!({ "id": 1, "nombre": "x", "cantidad": "lots" }))
        .into_item()
        .expect("item");
    assert!(item.quantity.is_nan());
}

#[test]
fn null_or_empty_array_quantity_reads_as_zero() {
    for quantity in [json!(null), json!([]), json!("")] {
        let item = request(json!({ "id": 1, "nombre": "x", "cantidad": quantity }))
            .into_item()
            .expect("item");
        assert_eq!(item.quantity, 0.0, "{quantity}");
    }
    let item = request(json!({ "id": 1, "nombre": "x", "cantidad": ["7"] }))
        .into_item()
        .expect("item");
    assert_eq!(item.quantity, 7.0);
}

#[test]
fn missing_quantity_stays_nan() {
    let item = request(json!({ "id": 1, "nombre": "x" }))
        .into_item()
        .expect("item");
    assert!(item.quantity.is_nan());
}

#[test]
fn non_numeric_price_is_dropped_and_negative_price_kept() {
    let item = request(json!({ "id": 1, "nombre": "x", "cantidad": 1, "precio": "cheap" }))
        .into_item()
        .expect("item");
    assert!(item.price.is_none());

    let item = request(json!({ "id": 1, "nombre": "x", "cantidad": 1, "precio": -2.5 }))
        .into_item()
        .expect("item");
    assert_eq!(item.price, Some(-2.5));
}

#[test]
fn stored_entries_written_with_loose_types_are_read() {
    let item = coerce_stored_item(json!({ "id": 1.0, "nombre": 5, "cantidad": "5", "precio": "abc" }))
        .expect("item");
    assert_eq!(item, Item::new(ItemId(1), "5", 5.0));

    let item = coerce_stored_item(json!({ "id": "2", "nombre": "nut", "cantidad": "lots" }))
        .expect("item");
    assert_eq!(item.quantity, 0.0);
}

#[test]
fn stored_entries_without_usable_id_are_rejected() {
    assert!(coerce_stored_item(json!("bolt")).is_err());
    assert!(coerce_stored_item(json!({ "nombre": "bolt", "cantidad": 1 })).is_err());
    assert!(coerce_stored_item(json!({ "id": 1.5, "nombre": "bolt", "cantidad": 1 })).is_err());
}

#[test]
fn null_price_counts_as_absent() {
    let item = request(json!({ "id": 1, "nombre": "x", "cantidad": 1, "precio": null }))
        .into_item()
        .expect("item");
    assert!(item.price.is_none());
}

#[test]
fn merge_response_uses_wire_action_names() {
    let response = MergeResponse {
        action: MergeAction::Merged,
        item: Item::new(ItemId(1), "bolt", 15.0),
    };
    let json = serde_json::to_value(&response).expect("json");
    assert_eq!(json["accion"], "sumado");
    assert_eq!(json["item"]["cantidad"], 15);
}
