//! Side-by-side comparison of selected cars.

use indexmap::IndexSet;
use serde::Serialize;

use crate::models::{format_detail, CarRecord};

/// Placeholder for attributes a car does not define.
pub const MISSING_VALUE: &str = "—";

/// One attribute compared across all cars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Attribute name shown in the first column.
    pub label: String,
    /// One cell per car, in column order.
    pub values: Vec<String>,
}

impl ComparisonRow {
    /// True when every car shares the same value.
    pub fn is_uniform(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// Attribute matrix with one column per car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    /// Column titles, one per car.
    pub headers: Vec<String>,
    /// Compared attributes.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Build the matrix for `cars`, in the given order.
    ///
    /// Rows are maker, model and edition followed by every extra field in the
    /// order it first appears across the cars.
    pub fn build(cars: &[CarRecord]) -> Self {
        let headers = cars.iter().map(CarRecord::display_name).collect();

        let mut rows = vec![
            ComparisonRow {
                label: "Maker".to_string(),
                values: cars.iter().map(|car| car.maker.clone()).collect(),
            },
            ComparisonRow {
                label: "Model".to_string(),
                values: cars.iter().map(|car| car.model.clone()).collect(),
            },
            ComparisonRow {
                label: "Edition".to_string(),
                values: cars
                    .iter()
                    .map(|car| {
                        car.edition
                            .clone()
                            .unwrap_or_else(|| MISSING_VALUE.to_string())
                    })
                    .collect(),
            },
        ];

        let keys: IndexSet<&str> = cars
            .iter()
            .flat_map(|car| car.details.keys().map(String::as_str))
            .collect();
        for key in keys {
            rows.push(ComparisonRow {
                label: humanize_key(key),
                values: cars
                    .iter()
                    .map(|car| {
                        car.details
                            .get(key)
                            .map(format_detail)
                            .unwrap_or_else(|| MISSING_VALUE.to_string())
                    })
                    .collect(),
            });
        }

        Self { headers, rows }
    }

    /// Number of compared cars.
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// `power_hp` -> `Power hp`.
fn humanize_key(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
