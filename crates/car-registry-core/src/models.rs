//! Car record types and request-body parsing.

use crate::error::{RegistryError, Result};
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Fields a client supplies for a car, in wire order.
pub const CAR_FIELDS: [&str; 5] = ["make", "model", "year", "color", "price"];

/// A stored car record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    /// Kept as a JSON number so integer prices round-trip without a `.0`.
    pub price: Number,
}

impl Car {
    pub fn new(
        id: i64,
        make: impl Into<String>,
        model: impl Into<String>,
        year: i64,
        color: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id,
            make: make.into(),
            model: model.into(),
            year,
            color: color.into(),
            price: Number::from(price),
        }
    }

    /// Overwrite every field the patch provides.
    pub fn apply(&mut self, patch: &CarPatch) {
        if let Some(make) = &patch.make {
            self.make = make.clone();
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(price) = &patch.price {
            self.price = price.clone();
        }
    }
}

/// The records present at process start.
pub fn seed_cars() -> Vec<Car> {
    vec![
        Car::new(1, "Toyota", "Camry", 2020, "Blue", 25000),
        Car::new(2, "Honda", "Civic", 2019, "Red", 22000),
        Car::new(3, "Ford", "Mustang", 2021, "Black", 35000),
    ]
}

/// A fully specified car awaiting an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub price: Number,
}

impl NewCar {
    /// Parse a create body. Every field in [`CAR_FIELDS`] must be present.
    pub fn from_json(body: Option<&Value>) -> Result<Self> {
        let fields = match body {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(RegistryError::MissingFields),
        };
        if !CAR_FIELDS.iter().all(|f| fields.contains_key(*f)) {
            return Err(RegistryError::MissingFields);
        }

        Ok(Self {
            make: parse_string("make", &fields["make"])?,
            model: parse_string("model", &fields["model"])?,
            year: parse_year(&fields["year"])?,
            color: parse_string("color", &fields["color"])?,
            price: parse_price(&fields["price"])?,
        })
    }

    pub fn into_car(self, id: i64) -> Car {
        Car {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            color: self.color,
            price: self.price,
        }
    }
}

/// A partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub color: Option<String>,
    pub price: Option<Number>,
}

impl CarPatch {
    /// Parse an update body.
    ///
    /// A missing, `null`, or otherwise empty body is `NoDataProvided`. Keys
    /// outside [`CAR_FIELDS`] are ignored, as are `null` values.
    pub fn from_json(body: Option<&Value>) -> Result<Self> {
        let body = match body {
            Some(value) if !is_empty_value(value) => value,
            _ => return Err(RegistryError::NoDataProvided),
        };
        let fields = body.as_object().ok_or_else(|| RegistryError::InvalidBody {
            message: "expected a JSON object".to_string(),
        })?;

        Ok(Self {
            make: optional(fields, "make", |v| parse_string("make", v))?,
            model: optional(fields, "model", |v| parse_string("model", v))?,
            year: optional(fields, "year", parse_year)?,
            color: optional(fields, "color", |v| parse_string("color", v))?,
            price: optional(fields, "price", parse_price)?,
        })
    }
}

fn optional<T>(
    fields: &Map<String, Value>,
    name: &str,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Option<T>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}

fn parse_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| RegistryError::invalid_field(field, "expected a string"))
}

fn parse_year(value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| RegistryError::invalid_field("year", "expected an integer"))
}

fn parse_price(value: &Value) -> Result<Number> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(RegistryError::invalid_field("price", "expected a number")),
    }
}

/// JSON values a request body treats as "nothing sent".
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
