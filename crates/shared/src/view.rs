//! Display-side projection of the item collection: search, ordering and the
//! inventory KPIs. Everything here is pure; callers fetch the collection and
//! re-run the projection whenever the search text or sort key changes.

use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Name,
    Quantity,
    Price,
    /// Keeps the incoming order. Unknown keys parse to this.
    #[default]
    Unsorted,
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "name" | "nombre" => Self::Name,
            "quantity" | "cantidad" => Self::Quantity,
            "price" | "precio" => Self::Price,
            _ => Self::Unsorted,
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpis {
    pub count: usize,
    pub total_quantity: f64,
    pub total_value: f64,
}

/// Case-insensitive substring match on name or category.
pub fn filter(items: &[Item], query: &str) -> Vec<Item> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&query)
                || item
                    .category
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&query)
        })
        .cloned()
        .collect()
}

/// Ascending and stable: items with equal keys keep their relative order.
pub fn sort(items: &[Item], key: SortKey) -> Vec<Item> {
    let mut sorted = items.to_vec();
    match key {
        SortKey::Id => sorted.sort_by_key(|item| item.id),
        SortKey::Name => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Quantity => sorted.sort_by(|a, b| a.quantity.total_cmp(&b.quantity)),
        SortKey::Price => sorted.sort_by(|a, b| {
            a.price
                .unwrap_or_default()
                .total_cmp(&b.price.unwrap_or_default())
        }),
        SortKey::Unsorted => {}
    }
    sorted
}

pub fn project(items: &[Item], query: &str, key: SortKey) -> Vec<Item> {
    sort(&filter(items, query), key)
}

/// KPIs for the whole inventory. Pass the unfiltered collection, not the
/// visible rows.
pub fn aggregate(items: &[Item]) -> Kpis {
    Kpis {
        count: items.len(),
        total_quantity: items.iter().map(|item| item.quantity).sum(),
        total_value: items.iter().map(line_total).sum(),
    }
}

pub fn line_total(item: &Item) -> f64 {
    item.price.unwrap_or_default() * item.quantity
}

/// Collation in three levels: base letters ignoring case and accents, then
/// accents, then case with lowercase first. `Ábaco` sorts with the `a`s and
/// `ñ` with the `n`s.
fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| accented_letters(a).cmp(&accented_letters(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn accented_letters(name: &str) -> String {
    name.nfd().collect::<String>().to_lowercase()
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
