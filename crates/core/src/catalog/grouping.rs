use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::CarRecord;

/// Editions sharing one maker/model key; rendered as a single catalog tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarGroup {
    /// `"{maker} {model}"`.
    pub model_name: String,
    /// Records in input order.
    pub editions: Vec<CarRecord>,
}

/// Partition `records` by maker/model.
///
/// Groups appear in the order their key is first seen; editions keep their
/// relative input order.
pub fn group_by_model(records: &[CarRecord]) -> Vec<CarGroup> {
    let mut buckets: IndexMap<String, Vec<CarRecord>> = IndexMap::new();
    for record in records {
        buckets
            .entry(record.model_name())
            .or_default()
            .push(record.clone());
    }

    buckets
        .into_iter()
        .map(|(model_name, editions)| CarGroup {
            model_name,
            editions,
        })
        .collect()
}

/// Content fingerprint of a record list.
pub fn fingerprint(records: &[CarRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.len().hash(&mut hasher);
    for record in records {
        record.id.hash(&mut hasher);
        record.maker.hash(&mut hasher);
        record.model.hash(&mut hasher);
        record.edition.hash(&mut hasher);
        record.details.len().hash(&mut hasher);
        for (key, value) in &record.details {
            key.hash(&mut hasher);
            value.to_string().hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Memoizes [`group_by_model`] on the content fingerprint of its input.
#[derive(Debug, Default)]
pub struct GroupingCache {
    fingerprint: Option<u64>,
    groups: Arc<Vec<CarGroup>>,
    recomputations: usize,
}

impl GroupingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grouping of `records`, recomputed only when their content changed.
    pub fn groups(&mut self, records: &[CarRecord]) -> Arc<Vec<CarGroup>> {
        let current = fingerprint(records);
        if self.fingerprint != Some(current) {
            self.groups = Arc::new(group_by_model(records));
            self.fingerprint = Some(current);
            self.recomputations += 1;
        }
        Arc::clone(&self.groups)
    }

    /// How many times the grouping was actually computed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
