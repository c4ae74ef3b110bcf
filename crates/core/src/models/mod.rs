//! Shared domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier of a catalog entry as delivered by the API.
///
/// The endpoint may use numeric or string ids; both are accepted and compared
/// by value, so `1` and `"1"` are different ids. Any JSON number is kept as
/// delivered, including floats and integers beyond `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CarId {
    /// Numeric id (e.g. `42`).
    Number(Number),
    /// Opaque string id (e.g. `"a4-2019"`).
    Text(String),
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarId::Number(value) => write!(f, "{value}"),
            CarId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for CarId {
    fn from(value: i64) -> Self {
        CarId::Number(value.into())
    }
}

impl From<&str> for CarId {
    fn from(value: &str) -> Self {
        CarId::Text(value.to_string())
    }
}

/// One catalog entry: a specific maker/model/edition car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Unique identifier.
    pub id: CarId,
    /// Manufacturer name (e.g. `Audi`).
    pub maker: String,
    /// Model name (e.g. `A4`).
    pub model: String,
    /// Optional edition/trim label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Any other display fields returned by the API.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl CarRecord {
    /// Build a record with no edition and no extra fields.
    pub fn new(id: impl Into<CarId>, maker: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            maker: maker.into(),
            model: model.into(),
            edition: None,
            details: Map::new(),
        }
    }

    /// Builder-style setter for the edition label.
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    /// Builder-style setter for an extra display field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// The grouping key: maker and model joined by a single space.
    pub fn model_name(&self) -> String {
        format!("{} {}", self.maker, self.model)
    }

    /// Returns a user-facing label combining model name and edition.
    pub fn display_name(&self) -> String {
        match self.edition.as_deref() {
            Some(edition) if !edition.is_empty() => format!("{} · {}", self.model_name(), edition),
            _ => self.model_name(),
        }
    }
}

/// Records returned by one catalog fetch.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Records in the order the API returned them.
    pub cars: Vec<CarRecord>,
    /// When the fetch completed; `None` for the empty fallback.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Wrap freshly fetched records, stamping the current time.
    pub fn fetched(cars: Vec<CarRecord>) -> Self {
        Self {
            cars,
            fetched_at: Some(Utc::now()),
        }
    }

    /// The empty catalog used when nothing could be loaded.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Render a JSON detail value for display.
pub fn format_detail(value: &Value) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_detail)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_and_string_ids_with_extra_fields() -> anyhow::Result<()> {
        let cars: Vec<CarRecord> = serde_json::from_value(json!([
            { "id": 1, "maker": "Audi", "model": "A4", "edition": "Avant", "price": 41000 },
            { "id": "x5-2020", "maker": "BMW", "model": "X5" }
        ]))?;

        assert_eq!(cars[0].id, CarId::from(1));
        assert_eq!(cars[0].edition.as_deref(), Some("Avant"));
        assert_eq!(cars[0].details.get("price"), Some(&json!(41000)));
        assert_eq!(cars[1].id, CarId::Text("x5-2020".to_string()));
        assert!(cars[1].details.is_empty());
        assert_ne!(CarId::from(1), CarId::Text("1".to_string()));
        Ok(())
    }

    #[test]
    fn any_json_number_is_a_valid_id() -> anyhow::Result<()> {
        let cars: Vec<CarRecord> = serde_json::from_value(json!([
            { "id": 1.5, "maker": "Audi", "model": "A4" },
            { "id": 18446744073709551615u64, "maker": "Audi", "model": "A6" },
            { "id": -3, "maker": "BMW", "model": "X5" }
        ]))?;

        assert_eq!(cars.len(), 3);
        assert_eq!(cars[0].id.to_string(), "1.5");
        assert_eq!(cars[1].id, CarId::Number(u64::MAX.into()));
        assert_eq!(cars[1].id.to_string(), "18446744073709551615");
        assert_eq!(cars[2].id, CarId::from(-3));
        assert_ne!(cars[0].id, CarId::from(1));
        Ok(())
    }

    #[test]
    fn display_name_includes_edition_when_present() {
        let plain = CarRecord::new(1, "Audi", "A4");
        assert_eq!(plain.display_name(), "Audi A4");
        let trimmed = plain.clone().with_edition("");
        assert_eq!(trimmed.display_name(), "Audi A4");
        let avant = plain.with_edition("Avant");
        assert_eq!(avant.display_name(), "Audi A4 · Avant");
    }

    #[test]
    fn formats_detail_values() {
        assert_eq!(format_detail(&json!("petrol")), "petrol");
        assert_eq!(format_detail(&json!(150)), "150");
        assert_eq!(format_detail(&json!(true)), "yes");
        assert_eq!(format_detail(&json!(["a", 2])), "a, 2");
        assert_eq!(format_detail(&Value::Null), "—");
    }
}
