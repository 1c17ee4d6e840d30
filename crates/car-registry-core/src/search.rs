//! Attribute search over the car collection.
//!
//! Filters are applied in a fixed order (make, model, min price, max price),
//! each narrowing the previous result. Parameters arrive as raw query-string
//! values; an empty or unparsable value disables its filter. A price bound of
//! `0` is indistinguishable from an absent one.

use crate::models::Car;
use serde_json::Number;
use std::cmp::Ordering;

/// Query parameters accepted by a car search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl SearchQuery {
    /// Build a query from decoded query-string pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = SearchQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "make" => &mut query.make,
                "model" => &mut query.model,
                "min_price" => &mut query.min_price,
                "max_price" => &mut query.max_price,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Case-insensitive make filter, if active.
    pub fn make(&self) -> Option<&str> {
        non_empty(&self.make)
    }

    /// Case-insensitive model filter, if active.
    pub fn model(&self) -> Option<&str> {
        non_empty(&self.model)
    }

    /// Inclusive lower price bound, if active.
    pub fn min_price(&self) -> Option<i64> {
        price_bound(&self.min_price)
    }

    /// Inclusive upper price bound, if active.
    pub fn max_price(&self) -> Option<i64> {
        price_bound(&self.max_price)
    }

    /// Narrow `cars` by each active filter in turn.
    pub fn apply(&self, mut cars: Vec<Car>) -> Vec<Car> {
        if let Some(make) = self.make() {
            let make = make.to_lowercase();
            cars.retain(|car| car.make.to_lowercase() == make);
        }
        if let Some(model) = self.model() {
            let model = model.to_lowercase();
            cars.retain(|car| car.model.to_lowercase() == model);
        }
        if let Some(min) = self.min_price() {
            cars.retain(|car| compare_price(&car.price, min) != Ordering::Less);
        }
        if let Some(max) = self.max_price() {
            cars.retain(|car| compare_price(&car.price, max) != Ordering::Greater);
        }
        cars
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn price_bound(value: &Option<String>) -> Option<i64> {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|bound| *bound != 0)
}

fn compare_price(price: &Number, bound: i64) -> Ordering {
    if let Some(p) = price.as_i64() {
        return p.cmp(&bound);
    }
    price
        .as_f64()
        .and_then(|p| p.partial_cmp(&(bound as f64)))
        .unwrap_or(Ordering::Greater)
}
