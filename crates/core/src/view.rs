#![allow(missing_docs)]

//! Catalog/comparison mode switching.

use tracing::{debug, info};

use crate::{compare::ComparisonTable, models::CarRecord, selection::SelectionStore};

/// Minimum number of selected cars required to open the comparison.
pub const MIN_COMPARISON_SIZE: usize = 2;

/// Which top-level screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Grouped grid with selection controls.
    #[default]
    Catalog,
    /// Side-by-side comparison of the selection.
    Comparison,
}

/// Owns the selection and the current mode.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    mode: ViewMode,
    selection: SelectionStore,
    compared: Vec<CarRecord>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Toggle `car` in the selection.
    ///
    /// Only applies in catalog mode; returns `None` when ignored, otherwise
    /// whether the car is selected afterwards.
    pub fn toggle(&mut self, car: &CarRecord) -> Option<bool> {
        if self.mode != ViewMode::Catalog {
            return None;
        }
        let selected = self.selection.toggle(car);
        debug!(id = %car.id, selected, total = self.selection.len(), "selection toggled");
        Some(selected)
    }

    pub fn is_selected(&self, car: &CarRecord) -> bool {
        self.selection.is_selected(car)
    }

    /// Whether the comparison can be opened right now.
    pub fn can_compare(&self) -> bool {
        self.mode == ViewMode::Catalog && self.selection.len() >= MIN_COMPARISON_SIZE
    }

    /// Whether a clear would do anything.
    pub fn can_clear(&self) -> bool {
        self.mode == ViewMode::Catalog && !self.selection.is_empty()
    }

    /// Switch to comparison mode. Returns `false` and stays put when fewer than
    /// two cars are selected.
    pub fn enter_comparison(&mut self) -> bool {
        if !self.can_compare() {
            debug!(selected = self.selection.len(), "comparison rejected");
            return false;
        }
        self.compared = self.selection.records();
        self.selection.settle();
        self.mode = ViewMode::Comparison;
        info!(cars = self.compared.len(), "entered comparison");
        true
    }

    /// Return to the catalog, keeping the selection.
    pub fn leave_comparison(&mut self) {
        if self.mode == ViewMode::Comparison {
            info!("returned to catalog");
        }
        self.mode = ViewMode::Catalog;
        self.compared.clear();
    }

    /// Empty the selection. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        if !self.can_clear() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Cars captured when the comparison was opened.
    pub fn compared(&self) -> &[CarRecord] {
        &self.compared
    }

    /// Comparison matrix while in comparison mode.
    pub fn comparison(&self) -> Option<ComparisonTable> {
        match self.mode {
            ViewMode::Comparison => Some(ComparisonTable::build(&self.compared)),
            ViewMode::Catalog => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarId;

    fn car(id: i64) -> CarRecord {
        CarRecord::new(id, "Audi", format!("A{id}"))
    }

    #[test]
    fn starts_in_catalog_with_empty_selection() {
        let view = ViewController::new();
        assert_eq!(view.mode(), ViewMode::Catalog);
        assert!(view.selection().is_empty());
        assert!(!view.can_compare());
        assert!(!view.can_clear());
        assert!(view.comparison().is_none());
    }

    #[test]
    fn single_selection_cannot_enter_comparison() {
        let mut view = ViewController::new();
        assert_eq!(view.toggle(&car(1)), Some(true));
        assert!(!view.enter_comparison());
        assert_eq!(view.mode(), ViewMode::Catalog);
    }

    #[test]
    fn comparison_unreachable_below_two_for_any_toggle_sequence() {
        let sequences: [&[i64]; 5] = [&[], &[1], &[1, 1], &[1, 2, 2], &[3, 1, 3, 1, 1]];
        for sequence in sequences {
            let mut view = ViewController::new();
            for id in sequence {
                view.toggle(&car(*id));
            }
            assert!(view.selection().len() < MIN_COMPARISON_SIZE);
            assert!(!view.enter_comparison(), "sequence {sequence:?}");
            assert_eq!(view.mode(), ViewMode::Catalog);
        }
    }

    #[test]
    fn comparison_round_trip_preserves_selection() {
        let mut view = ViewController::new();
        view.toggle(&car(1));
        view.toggle(&car(2));
        assert!(view.enter_comparison());
        assert_eq!(view.mode(), ViewMode::Comparison);

        let table = view.comparison().expect("comparison table");
        assert_eq!(table.headers, vec!["Audi A1", "Audi A2"]);

        // Selection is frozen while comparing.
        assert_eq!(view.toggle(&car(3)), None);
        assert!(!view.clear());
        assert_eq!(view.selection().len(), 2);

        view.leave_comparison();
        assert_eq!(view.mode(), ViewMode::Catalog);
        assert_eq!(
            view.selection().ids(),
            vec![CarId::from(1), CarId::from(2)]
        );
        assert!(view.comparison().is_none());
    }

    #[test]
    fn reselecting_after_a_comparison_appends() {
        let mut view = ViewController::new();
        for id in [1, 2, 3] {
            view.toggle(&car(id));
        }
        view.toggle(&car(1));
        assert!(view.enter_comparison());
        view.leave_comparison();

        assert_eq!(view.toggle(&car(1)), Some(true));
        assert_eq!(
            view.selection().ids(),
            vec![CarId::from(2), CarId::from(3), CarId::from(1)]
        );
    }

    #[test]
    fn leaving_is_always_allowed() {
        let mut view = ViewController::new();
        view.leave_comparison();
        assert_eq!(view.mode(), ViewMode::Catalog);
    }

    #[test]
    fn clear_only_acts_on_a_non_empty_catalog_selection() {
        let mut view = ViewController::new();
        assert!(!view.clear());
        view.toggle(&car(1));
        view.toggle(&car(2));
        view.toggle(&car(3));
        assert!(view.clear());
        assert!(view.selection().is_empty());
        assert!(!view.can_compare());
    }
}
