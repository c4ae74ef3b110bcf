#![warn(clippy::all, missing_docs)]

//! Core domain logic for carcompare.
//!
//! This crate hosts the car data model, configuration handling, the catalog
//! client and grouping engine, the comparison selection rules, and the label
//! translation helpers used by the terminal frontend and the dev server.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod models;
pub mod selection;
pub mod translate;
pub mod view;

pub use catalog::{group_by_model, CarGroup, Catalog, CatalogClient, GroupingCache};
pub use compare::{ComparisonRow, ComparisonTable};
pub use config::AppConfig;
pub use error::CatalogError;
pub use models::{CarId, CarRecord, CatalogSnapshot};
pub use selection::SelectionStore;
pub use translate::{translate_allowed_payment_methods, translate_status};
pub use view::{ViewController, ViewMode};
