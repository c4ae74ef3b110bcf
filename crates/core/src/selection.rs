//! Cars picked for comparison.

use indexmap::IndexMap;

use crate::models::{CarId, CarRecord};

/// Ordered set of selected cars, unique by id.
///
/// Iteration follows insertion order. A car removed by [`toggle`](Self::toggle)
/// and toggled again right away returns to its former slot, so two toggles of
/// the same id leave the selection exactly as it was. The slot is forgotten on
/// any other toggle, on [`clear`](Self::clear) and on [`settle`](Self::settle).
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    cars: IndexMap<CarId, CarRecord>,
    // Slot vacated by the most recent toggle-off.
    vacated: Option<(CarId, usize)>,
}

impl SelectionStore {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `car` if absent, deselect it if present. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, car: &CarRecord) -> bool {
        if let Some((index, _, _)) = self.cars.shift_remove_full(&car.id) {
            self.vacated = Some((car.id.clone(), index));
            return false;
        }

        match self.vacated.take() {
            Some((id, index)) if id == car.id && index <= self.cars.len() => {
                self.cars.shift_insert(index, car.id.clone(), car.clone());
            }
            _ => {
                self.cars.insert(car.id.clone(), car.clone());
            }
        }
        true
    }

    /// Remove every selected car.
    pub fn clear(&mut self) {
        self.cars.clear();
        self.vacated = None;
    }

    /// Forget the slot left by the last toggle-off, so re-selecting that car
    /// appends it.
    pub fn settle(&mut self) {
        self.vacated = None;
    }

    /// Membership test by id.
    pub fn is_selected(&self, car: &CarRecord) -> bool {
        self.contains(&car.id)
    }

    /// Membership test for a raw id.
    pub fn contains(&self, id: &CarId) -> bool {
        self.cars.contains_key(id)
    }

    /// Number of selected cars.
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Selected cars in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CarRecord> {
        self.cars.values()
    }

    /// Owned copy of the selection in insertion order.
    pub fn records(&self) -> Vec<CarRecord> {
        self.cars.values().cloned().collect()
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> Vec<CarId> {
        self.cars.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(id: i64) -> CarRecord {
        CarRecord::new(id, "Audi", "A4")
    }

    fn ids(store: &SelectionStore) -> Vec<i64> {
        store
            .ids()
            .into_iter()
            .map(|id| match id {
                CarId::Number(value) => value.as_i64().expect("integer id"),
                CarId::Text(text) => panic!("unexpected text id {text}"),
            })
            .collect()
    }

    #[test]
    fn toggle_one_two_one_leaves_two() {
        let mut store = SelectionStore::new();
        assert!(store.toggle(&car(1)));
        assert!(store.toggle(&car(2)));
        assert!(!store.toggle(&car(1)));
        assert_eq!(ids(&store), vec![2]);
        assert!(!store.is_selected(&car(1)));
        assert!(store.is_selected(&car(2)));
    }

    #[test]
    fn double_toggle_restores_content_and_order() {
        let mut store = SelectionStore::new();
        for id in [1, 2, 3] {
            store.toggle(&car(id));
        }

        // Absent id: appended then removed.
        store.toggle(&car(4));
        store.toggle(&car(4));
        assert_eq!(ids(&store), vec![1, 2, 3]);

        // Present id: removed then reinserted at its slot.
        for id in [1, 2, 3] {
            store.toggle(&car(id));
            store.toggle(&car(id));
            assert_eq!(ids(&store), vec![1, 2, 3], "after double toggle of {id}");
        }
    }

    #[test]
    fn reselecting_after_other_changes_appends() {
        let mut store = SelectionStore::new();
        store.toggle(&car(1));
        store.toggle(&car(2));
        store.toggle(&car(1));
        store.toggle(&car(3));
        store.toggle(&car(1));
        assert_eq!(ids(&store), vec![2, 3, 1]);
    }

    #[test]
    fn settled_selection_appends_a_reselected_car() {
        let mut store = SelectionStore::new();
        for id in [1, 2, 3] {
            store.toggle(&car(id));
        }
        store.toggle(&car(1));
        store.settle();
        store.toggle(&car(1));
        assert_eq!(ids(&store), vec![2, 3, 1]);
    }

    #[test]
    fn uniqueness_is_by_id_not_by_value() {
        let mut store = SelectionStore::new();
        store.toggle(&car(7));
        let same_id = CarRecord::new(7, "BMW", "X5").with_edition("M");
        assert!(store.is_selected(&same_id));
        assert!(!store.toggle(&same_id));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_empties_any_selection() {
        let mut store = SelectionStore::new();
        store.clear();
        assert!(store.is_empty());

        for id in 0..10 {
            store.toggle(&car(id));
        }
        assert_eq!(store.len(), 10);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);

        // A cleared id is appended, not restored to an old slot.
        store.toggle(&car(4));
        assert_eq!(ids(&store), vec![4]);
    }
}
