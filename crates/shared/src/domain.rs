use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One inventory record. Field names on the wire and on disk keep the
/// Spanish keys the data file has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad", with = "number")]
    pub quantity: f64,
    #[serde(
        rename = "precio",
        default,
        skip_serializing_if = "Option::is_none",
        with = "number::option"
    )]
    pub price: Option<f64>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: f64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            price: None,
            category: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Partial replacement for an existing item. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "cantidad",
        default,
        skip_serializing_if = "Option::is_none",
        with = "number::option"
    )]
    pub quantity: Option<f64>,
    #[serde(
        rename = "precio",
        default,
        skip_serializing_if = "Option::is_none",
        with = "number::option"
    )]
    pub price: Option<f64>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }

    pub fn apply_to(self, existing: &Item) -> Item {
        Item {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            quantity: self.quantity.unwrap_or(existing.quantity),
            price: self.price.or(existing.price),
            category: self.category.or_else(|| existing.category.clone()),
        }
    }
}

impl From<&Item> for ItemPatch {
    fn from(item: &Item) -> Self {
        Self {
            name: Some(item.name.clone()),
            quantity: Some(item.quantity),
            price: item.price,
            category: item.category.clone(),
        }
    }
}

/// Whole numbers are written as JSON integers so files stay readable and
/// match what older writers produced.
mod number {
    use serde::{Deserialize, Deserializer, Serializer};

    // 2^53, the last integer an f64 represents exactly.
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    // Non-finite quantities were persisted as `null`; read them back as zero.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            Option::<f64>::deserialize(deserializer)
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
