use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Item, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeAction {
    #[serde(rename = "creado")]
    Created,
    #[serde(rename = "sumado")]
    Merged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResponse {
    #[serde(rename = "accion")]
    pub action: MergeAction,
    pub item: Item,
}

/// Body of `POST /api/items` before coercion. Browsers post form values, so
/// numbers may arrive as strings and names as numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "nombre", default)]
    pub name: Option<Value>,
    /// `Some(Value::Null)` when the body carries `"cantidad": null`, which
    /// counts as zero; `None` only when the key is missing.
    #[serde(rename = "cantidad", default, deserialize_with = "present")]
    pub quantity: Option<Value>,
    #[serde(rename = "precio", default)]
    pub price: Option<Value>,
    #[serde(rename = "categoria", default)]
    pub category: Option<Value>,
}

impl CreateItemRequest {
    /// Coerces the raw body into an [`Item`]. Only an id that cannot be read
    /// as an integer fails here; range and emptiness checks belong to the
    /// store, which sees a NaN quantity for anything that is not numeric.
    /// A price that is not a finite number is dropped.
    pub fn into_item(self) -> Result<Item, String> {
        let id = self
            .id
            .as_ref()
            .and_then(coerce_integer)
            .ok_or_else(|| "id must be a positive integer".to_string())?;
        let name = self.name.as_ref().and_then(coerce_text).unwrap_or_default();
        let quantity = self
            .quantity
            .as_ref()
            .and_then(coerce_number)
            .unwrap_or(f64::NAN);

        Ok(Item {
            id: ItemId(id),
            name,
            quantity,
            price: self
                .price
                .as_ref()
                .and_then(coerce_number)
                .filter(|price| price.is_finite()),
            category: self.category.as_ref().and_then(coerce_text),
        })
    }
}

/// Reads one element of the persisted collection with the same coercions as a
/// POST body. Files written by older servers may hold numeric strings, numeric
/// names, or `null` quantities; only an element without a usable id fails.
pub fn coerce_stored_item(value: Value) -> Result<Item, String> {
    if !value.is_object() {
        return Err("entry is not an object".to_string());
    }
    let request: CreateItemRequest =
        serde_json::from_value(value).map_err(|err| err.to_string())?;
    let mut item = request.into_item()?;
    if !item.quantity.is_finite() {
        item.quantity = 0.0;
    }
    Ok(item)
}

/// Number coercion for loosely typed input: `null` and `[]` read as zero, a
/// one-element array as its element, objects and other arrays as nothing.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                Some(0.0)
            } else {
                text.parse::<f64>().ok()
            }
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(values) => match values.as_slice() {
            [] => Some(0.0),
            [single] => coerce_number(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn coerce_integer(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let number = coerce_number(value)?;
    if number.fract() != 0.0 || number < i64::MIN as f64 || number > i64::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
