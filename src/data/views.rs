use serde::Deserialize;

use super::aggregate::{Aggregation, by_age_and_race, by_age_group, by_race};
use super::filter::CrossFilterController;
use super::model::{Dataset, Dimension};

// ---------------------------------------------------------------------------
// Per-view read functions: what each chart must draw
// ---------------------------------------------------------------------------

/// Ordering of the age-group bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOrder {
    /// Tallest bar first (ties keep first-seen order).
    #[default]
    CountDescending,
    /// Order in which age groups first appear in the file.
    FirstSeen,
}

/// One labelled category mark (pie slice or bar).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMark {
    pub label: String,
    pub count: usize,
    /// Fraction of the aggregation total, in `0.0..=1.0`.
    pub share: f64,
    pub selected: bool,
}

impl CategoryMark {
    /// Tooltip text: `label: count (pct%)`.
    pub fn tooltip(&self) -> String {
        format!("{}: {} ({:.2}%)", self.label, self.count, self.share * 100.0)
    }
}

fn category_marks<'a>(
    entries: impl IntoIterator<Item = (&'a str, usize)>,
    total: usize,
    dimension: Dimension,
    controller: &CrossFilterController,
) -> Vec<CategoryMark> {
    entries
        .into_iter()
        .map(|(label, count)| CategoryMark {
            label: label.to_string(),
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
            selected: controller.is_selected(dimension, label),
        })
        .collect()
}

/// Pie slices: race/ethnicity counts over the full dataset, in first-seen
/// order.
pub fn pie_slices(dataset: &Dataset, controller: &CrossFilterController) -> Vec<CategoryMark> {
    let agg = by_race(&dataset.records);
    let total = agg.total();
    category_marks(agg, total, Dimension::Race, controller)
}

/// Bars: age-group counts over the full dataset.
pub fn age_bars(
    dataset: &Dataset,
    controller: &CrossFilterController,
    order: BarOrder,
) -> Vec<CategoryMark> {
    let agg = by_age_group(&dataset.records);
    let total = agg.total();
    match order {
        BarOrder::CountDescending => {
            let sorted = agg.sorted_by_count_desc().into_iter().map(|(k, c)| (*k, c));
            category_marks(sorted, total, Dimension::AgeGroup, controller)
        }
        BarOrder::FirstSeen => category_marks(agg, total, Dimension::AgeGroup, controller),
    }
}

/// One non-empty heatmap cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    /// Index into [`HeatmapGrid::age_groups`].
    pub column: usize,
    /// Index into [`HeatmapGrid::races`].
    pub row: usize,
    pub count: usize,
    pub highlighted: bool,
}

/// Heatmap contents. Axes come from the full dataset so they stay put while
/// filtering; cells come from the filtered subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapGrid {
    pub age_groups: Vec<String>,
    pub races: Vec<String>,
    pub cells: Vec<HeatmapCell>,
    /// Largest cell count (0 when there are no cells).
    pub max_count: usize,
}

impl HeatmapGrid {
    /// Tooltip text for a cell: `age - race: count`.
    pub fn tooltip(&self, cell: &HeatmapCell) -> String {
        let age = self.age_groups.get(cell.column).map_or("?", String::as_str);
        let race = self.races.get(cell.row).map_or("?", String::as_str);
        format!("{age} - {race}: {}", cell.count)
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }
}

/// Heatmap grid for the current selection.
pub fn heatmap_grid(dataset: &Dataset, controller: &CrossFilterController) -> HeatmapGrid {
    let counts: Aggregation<(&str, &str)> = by_age_and_race(controller.filtered_records(dataset));

    let cells: Vec<HeatmapCell> = counts
        .iter()
        .filter_map(|(&(age, race), count)| {
            Some(HeatmapCell {
                column: dataset.age_groups.get_index_of(age)?,
                row: dataset.races.get_index_of(race)?,
                count,
                highlighted: controller.is_cell_highlighted(age, race),
            })
        })
        .collect();

    HeatmapGrid {
        age_groups: dataset.age_groups.iter().cloned().collect(),
        races: dataset.races.iter().cloned().collect(),
        max_count: counts.max_count().unwrap_or(0),
        cells,
    }
}
