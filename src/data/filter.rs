use std::collections::BTreeSet;

use super::model::{Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Selection state: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Selected values per dimension. An empty set means "no filter" on that
/// dimension (show all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub races: BTreeSet<String>,
    pub age_groups: BTreeSet<String>,
}

impl SelectionState {
    pub fn set(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Race => &self.races,
            Dimension::AgeGroup => &self.age_groups,
        }
    }

    fn set_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Race => &mut self.races,
            Dimension::AgeGroup => &mut self.age_groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty() && self.age_groups.is_empty()
    }

    /// A record passes a dimension when that dimension has no selection or
    /// the record's value is one of the selected values.
    fn admits(&self, dimension: Dimension, record: &Record) -> bool {
        let selected = self.set(dimension);
        selected.is_empty()
            || record
                .value(dimension)
                .is_some_and(|v| selected.contains(v))
    }

    /// Conjunction across dimensions, disjunction within one.
    pub fn matches(&self, record: &Record) -> bool {
        self.admits(Dimension::Race, record) && self.admits(Dimension::AgeGroup, record)
    }
}

// ---------------------------------------------------------------------------
// Cross-filter controller
// ---------------------------------------------------------------------------

/// Owns the selection shared by the pie, bar and heatmap views.
///
/// Mutation happens only through [`toggle`](Self::toggle) and
/// [`clear`](Self::clear); re-rendering afterwards is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct CrossFilterController {
    selection: SelectionState,
}

impl CrossFilterController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Add `value` to the selection of `dimension`, or remove it if it is
    /// already there. Unknown values are accepted; they simply match nothing.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let selected = self.selection.set_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        log::debug!(
            "Toggled {dimension} '{value}' → {} selected",
            self.selection.set(dimension).len()
        );
    }

    pub fn toggle_race(&mut self, value: &str) {
        self.toggle(Dimension::Race, value);
    }

    pub fn toggle_age_group(&mut self, value: &str) {
        self.toggle(Dimension::AgeGroup, value);
    }

    /// Deselect everything on both dimensions.
    pub fn clear(&mut self) {
        self.selection.races.clear();
        self.selection.age_groups.clear();
        log::debug!("Cleared cross-filter selection");
    }

    /// Drop selected values that never occur in `dataset`. Returns how many
    /// were removed.
    pub fn prune(&mut self, dataset: &Dataset) -> usize {
        let mut removed = 0;
        for dimension in [Dimension::Race, Dimension::AgeGroup] {
            let selected = self.selection.set_mut(dimension);
            let before = selected.len();
            selected.retain(|v| dataset.contains_value(dimension, v));
            removed += before - selected.len();
        }
        if removed > 0 {
            log::debug!("Pruned {removed} stale selection value(s)");
        }
        removed
    }

    /// Records of `dataset` that pass the current selection.
    ///
    /// The iterator is lazy and `Clone`, so it can be walked repeatedly with
    /// identical results while the selection is unchanged.
    pub fn filtered_records<'a>(
        &'a self,
        dataset: &'a Dataset,
    ) -> impl Iterator<Item = &'a Record> + Clone + 'a {
        let selection = &self.selection;
        dataset.records.iter().filter(move |r| selection.matches(r))
    }

    /// Whether a pie slice or bar for `value` should be drawn highlighted.
    pub fn is_selected(&self, dimension: Dimension, value: &str) -> bool {
        self.selection.set(dimension).contains(value)
    }

    /// A heatmap cell is highlighted when its age group OR its race is
    /// selected.
    pub fn is_cell_highlighted(&self, age_group: &str, race: &str) -> bool {
        self.is_selected(Dimension::AgeGroup, age_group) || self.is_selected(Dimension::Race, race)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::by_age_group;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new("18-24", "White"),
            Record::new("18-24", "Black"),
            Record::new("25-34", "White"),
        ])
    }

    fn collect<'a>(ctl: &'a CrossFilterController, ds: &'a Dataset) -> Vec<&'a Record> {
        ctl.filtered_records(ds).collect()
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("Asian");
        let before = ctl.selection().clone();
        ctl.toggle_race("White");
        ctl.toggle_race("White");
        assert_eq!(ctl.selection(), &before);
    }

    #[test]
    fn test_toggle_three_times_equals_once() {
        let mut once = CrossFilterController::new();
        once.toggle_age_group("65+");

        let mut thrice = CrossFilterController::new();
        for _ in 0..3 {
            thrice.toggle_age_group("65+");
        }
        assert_eq!(once.selection(), thrice.selection());
    }

    #[test]
    fn test_toggles_commute() {
        let mut ab = CrossFilterController::new();
        ab.toggle_race("White");
        ab.toggle_race("Black");

        let mut ba = CrossFilterController::new();
        ba.toggle_race("Black");
        ba.toggle_race("White");

        assert_eq!(ab.selection(), ba.selection());
    }

    #[test]
    fn test_empty_selection_yields_full_dataset() {
        let ds = sample();
        let ctl = CrossFilterController::new();
        assert_eq!(ctl.filtered_records(&ds).count(), ds.len());
    }

    #[test]
    fn test_race_toggle_scenario() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();

        ctl.toggle_race("White");
        let filtered = collect(&ctl, &ds);
        assert_eq!(filtered, vec![&ds.records[0], &ds.records[2]]);
        let ages = by_age_group(ctl.filtered_records(&ds));
        assert_eq!(ages.get(&"18-24"), 1);
        assert_eq!(ages.get(&"25-34"), 1);

        ctl.toggle_race("White");
        assert_eq!(ctl.filtered_records(&ds).count(), 3);
        let ages = by_age_group(ctl.filtered_records(&ds));
        assert_eq!(ages.get(&"18-24"), 2);
        assert_eq!(ages.get(&"25-34"), 1);
    }

    #[test]
    fn test_and_across_dimensions() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_age_group("18-24");
        ctl.toggle_race("Black");
        assert_eq!(collect(&ctl, &ds), vec![&Record::new("18-24", "Black")]);
    }

    #[test]
    fn test_or_within_dimension() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("White");
        ctl.toggle_race("Black");
        assert_eq!(ctl.filtered_records(&ds).count(), 3);

        ctl.toggle_age_group("25-34");
        assert_eq!(collect(&ctl, &ds), vec![&Record::new("25-34", "White")]);
    }

    #[test]
    fn test_filtered_is_subset_satisfying_both_predicates() {
        let ds = Dataset::from_records(vec![
            Record::new("0-17", "Asian"),
            Record::new("18-24", "White"),
            Record::new("65+", "Black"),
            Record::new("18-24", "Asian"),
            Record::new("65+", "White"),
        ]);
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("Asian");
        ctl.toggle_race("White");
        ctl.toggle_age_group("18-24");
        ctl.toggle_age_group("65+");

        let filtered = collect(&ctl, &ds);
        let expected: Vec<&Record> = ds
            .records
            .iter()
            .filter(|r| {
                let race_ok = matches!(r.race_ethnicity.as_deref(), Some("Asian" | "White"));
                let age_ok = matches!(r.age_group.as_deref(), Some("18-24" | "65+"));
                race_ok && age_ok
            })
            .collect();
        assert_eq!(filtered, expected);
        assert!(filtered.len() <= ds.len());
    }

    #[test]
    fn test_filtered_records_is_restartable() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_age_group("18-24");
        let iter = ctl.filtered_records(&ds);
        let first: Vec<&Record> = iter.clone().collect();
        let second: Vec<&Record> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_clear_restores_full_dataset() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("Black");
        ctl.toggle_age_group("25-34");
        assert_eq!(ctl.filtered_records(&ds).count(), 0);

        ctl.clear();
        assert!(!ctl.has_selection());
        assert_eq!(ctl.filtered_records(&ds).count(), ds.len());
    }

    #[test]
    fn test_unknown_value_matches_nothing_until_cleared() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("Martian");
        assert!(ctl.is_selected(Dimension::Race, "Martian"));
        assert_eq!(ctl.filtered_records(&ds).count(), 0);
        ctl.clear();
        assert_eq!(ctl.filtered_records(&ds).count(), 3);
    }

    #[test]
    fn test_missing_field_fails_only_active_filter() {
        let ds = Dataset::from_records(vec![
            Record {
                age_group: None,
                race_ethnicity: Some("White".into()),
            },
            Record::new("18-24", "White"),
        ]);
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("White");
        assert_eq!(ctl.filtered_records(&ds).count(), 2);
        ctl.toggle_age_group("18-24");
        assert_eq!(ctl.filtered_records(&ds).count(), 1);
    }

    #[test]
    fn test_prune_drops_stale_values() {
        let ds = sample();
        let mut ctl = CrossFilterController::new();
        ctl.toggle_race("White");
        ctl.toggle_race("Martian");
        ctl.toggle_age_group("99+");
        assert_eq!(ctl.prune(&ds), 2);
        assert!(ctl.is_selected(Dimension::Race, "White"));
        assert!(!ctl.is_selected(Dimension::Race, "Martian"));
        assert!(ctl.selection().age_groups.is_empty());
        assert_eq!(ctl.prune(&ds), 0);
    }

    #[test]
    fn test_cell_highlight_is_row_or_column() {
        let mut ctl = CrossFilterController::new();
        assert!(!ctl.is_cell_highlighted("18-24", "White"));

        ctl.toggle_race("White");
        assert!(ctl.is_cell_highlighted("18-24", "White"));
        assert!(ctl.is_cell_highlighted("65+", "White"));
        assert!(!ctl.is_cell_highlighted("18-24", "Black"));

        ctl.toggle_age_group("18-24");
        assert!(ctl.is_cell_highlighted("18-24", "Black"));
    }
}
