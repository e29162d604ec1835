use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::filter::CrossFilterController;
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Dimension};
use crate::data::views::{CategoryMark, HeatmapGrid, age_bars, heatmap_grid, pie_slices};

// ---------------------------------------------------------------------------
// Cached per-view data
// ---------------------------------------------------------------------------

/// What the three charts draw, recomputed after every mutation.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    pub pie: Vec<CategoryMark>,
    pub bars: Vec<CategoryMark>,
    pub heatmap: HeatmapGrid,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file has been loaded successfully).
    pub dataset: Option<Dataset>,

    /// Cross-filter selection shared by all views.
    pub controller: CrossFilterController,

    /// Chart data derived from `dataset` and `controller`.
    pub views: ViewData,

    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Config problem found at startup. Unlike `status_message` it is not
    /// cleared by a successful load.
    pub config_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset, prune stale selections and rebuild
    /// the views.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.controller.prune(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_views();
    }

    /// Load `path` and make it the current dataset. On failure the previous
    /// dataset (if any) stays in place and the error is reported once in the
    /// status bar.
    pub fn load(&mut self, path: &Path) {
        match load_file(path, &self.config) {
            Ok(dataset) => {
                if dataset.skipped_rows > 0 {
                    log::warn!("{} rows could not be decoded", dataset.skipped_rows);
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
            }
        }
    }

    /// Recompute everything the charts draw.
    pub fn refresh_views(&mut self) {
        self.views = match &self.dataset {
            Some(ds) => ViewData {
                pie: pie_slices(ds, &self.controller),
                bars: age_bars(ds, &self.controller, self.config.bar_order),
                heatmap: heatmap_grid(ds, &self.controller),
            },
            None => ViewData::default(),
        };
    }

    /// Toggle a value on one dimension and re-render.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        self.controller.toggle(dimension, value);
        self.refresh_views();
    }

    /// Deselect all and re-render.
    pub fn clear_selection(&mut self) {
        self.controller.clear();
        self.refresh_views();
    }

    /// Number of records passing the current selection.
    pub fn filtered_count(&self) -> usize {
        self.dataset
            .as_ref()
            .map_or(0, |ds| self.controller.filtered_records(ds).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_records(vec![
            Record::new("18-24", "White"),
            Record::new("18-24", "Black"),
            Record::new("25-34", "White"),
        ]));
        state
    }

    #[test]
    fn test_toggle_refreshes_heatmap() {
        let mut state = loaded();
        assert_eq!(state.views.heatmap.total(), 3);

        state.toggle(Dimension::Race, "White");
        assert_eq!(state.views.heatmap.total(), 2);
        assert_eq!(state.filtered_count(), 2);
        assert!(state.views.pie.iter().any(|s| s.label == "White" && s.selected));

        state.clear_selection();
        assert_eq!(state.views.heatmap.total(), 3);
    }

    #[test]
    fn test_new_dataset_prunes_selection() {
        let mut state = loaded();
        state.toggle(Dimension::AgeGroup, "25-34");
        state.set_dataset(Dataset::from_records(vec![Record::new("65+", "Asian")]));
        assert!(!state.controller.has_selection());
        assert_eq!(state.views.heatmap.total(), 1);
    }

    #[test]
    fn test_config_error_survives_dataset_load() {
        let mut state = AppState {
            config_error: Some("Config error: bad json".into()),
            ..AppState::default()
        };
        state.set_dataset(Dataset::from_records(vec![Record::new("18-24", "White")]));
        assert_eq!(state.config_error.as_deref(), Some("Config error: bad json"));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        state.load(Path::new("/nonexistent/cases.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(3));
    }

    #[test]
    fn test_no_dataset_means_empty_views() {
        let mut state = AppState::default();
        state.toggle(Dimension::Race, "White");
        assert!(state.views.pie.is_empty());
        assert_eq!(state.filtered_count(), 0);
    }
}
