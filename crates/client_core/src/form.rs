use shared::domain::{Item, ItemId};
use thiserror::Error;

/// Raw text of the item form fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("id must be a positive integer")]
    InvalidId,
    #[error("name is required")]
    MissingName,
    #[error("quantity must be a number")]
    InvalidQuantity,
}

impl ItemForm {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            price: item.price.map(|price| price.to_string()).unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
        }
    }

    /// Blank price or category means "not supplied"; a price that does not
    /// parse is dropped the same way. A blank quantity reads as zero.
    pub fn parse(&self) -> Result<Item, FormError> {
        let id = parse_number(&self.id)
            .filter(|id| id.fract() == 0.0 && *id > 0.0 && *id <= i64::MAX as f64)
            .ok_or(FormError::InvalidId)?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        let quantity = parse_number(&self.quantity).ok_or(FormError::InvalidQuantity)?;

        Ok(Item {
            id: ItemId(id as i64),
            name: name.to_string(),
            quantity,
            price: non_blank(&self.price).and_then(parse_number),
            category: non_blank(&self.category).map(str::to_string),
        })
    }
}

pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("${value:.2}"),
        _ => "$0.00".to_string(),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn non_blank(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty()).then_some(raw)
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
