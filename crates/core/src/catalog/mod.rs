//! Catalog loading and grouping.

/// HTTP client for the car catalog endpoint.
pub mod client;
/// Maker/model grouping and its memoizing cache.
pub mod grouping;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::models::{CarRecord, CatalogSnapshot};

pub use client::CatalogClient;
pub use grouping::{group_by_model, CarGroup, GroupingCache};

/// Thread-safe holder of the current catalog and its grouping.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    cars: Vec<CarRecord>,
    cache: GroupingCache,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records with a freshly loaded snapshot.
    pub fn replace(&self, snapshot: CatalogSnapshot) {
        let mut inner = self.inner.write();
        debug!(count = snapshot.cars.len(), "catalog replaced");
        inner.cars = snapshot.cars;
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.inner.read().cars.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().cars.is_empty()
    }

    /// Grouping of the current records, recomputed only when they changed.
    pub fn groups(&self) -> Arc<Vec<CarGroup>> {
        let mut inner = self.inner.write();
        let Inner { cars, cache, .. } = &mut *inner;
        cache.groups(cars)
    }

    /// How many times grouping has been computed for this catalog.
    pub fn recomputations(&self) -> usize {
        self.inner.read().cache.recomputations()
    }
}
