use std::path::Path;

use sales_dashboard::data::{FilterCriteria, SalesCache, SalesView};
use sales_dashboard::view::{render, DashboardSummary};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded table (None until a file loads successfully).
    pub cache: Option<SalesCache>,

    /// Year / State selection. Starts empty, which shows nothing.
    pub criteria: FilterCriteria,

    /// Indices of rows passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates for the current filter (cached).
    pub summary: Option<DashboardSummary>,

    /// Category colours for the ship-mode histogram, fixed per table.
    pub category_colors: ColorMap,

    /// Segment colours for the contribution chart, fixed per table.
    pub segment_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` into a fresh cache, or report why it failed.
    pub fn open(&mut self, path: &Path) {
        match SalesCache::load(path) {
            Ok(cache) => self.set_cache(cache),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded table and reset the selection.
    pub fn set_cache(&mut self, cache: SalesCache) {
        let table = cache.table();
        let mut categories: Vec<&str> = table.records().iter().map(|r| r.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        self.category_colors = ColorMap::new(categories);

        let mut segments: Vec<&str> = table.records().iter().map(|r| r.segment.as_str()).collect();
        segments.sort_unstable();
        segments.dedup();
        self.segment_colors = ColorMap::new(segments);

        self.cache = Some(cache);
        self.criteria = FilterCriteria::default();
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and `summary` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(cache) = &self.cache {
            let vm = render(cache.table(), &self.criteria);
            self.visible_indices = vm.rows.indices().to_vec();
            self.summary = Some(vm.summary);
        }
    }

    /// The rows behind the current summary.
    pub fn visible_rows(&self) -> Option<SalesView<'_>> {
        self.cache
            .as_ref()
            .map(|c| SalesView::from_indices(c.table(), self.visible_indices.clone()))
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.criteria.toggle_year(year);
        self.refilter();
    }

    pub fn toggle_state(&mut self, state: &str) {
        self.criteria.toggle_state(state);
        self.refilter();
    }

    pub fn select_all_years(&mut self) {
        if let Some(cache) = &self.cache {
            self.criteria.years = cache.table().years().clone();
            self.refilter();
        }
    }

    pub fn select_no_years(&mut self) {
        self.criteria.years.clear();
        self.refilter();
    }

    pub fn select_all_states(&mut self) {
        if let Some(cache) = &self.cache {
            self.criteria.states = cache.table().states().clone();
            self.refilter();
        }
    }

    pub fn select_no_states(&mut self) {
        self.criteria.states.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use sales_dashboard::data::{SalesRecord, SalesTable};

    use super::*;

    fn loaded_state() -> AppState {
        let records = [("CA", 2015, 10.0), ("NY", 2016, 20.0), ("CA", 2016, 30.0)]
            .into_iter()
            .map(|(state, year, sales)| {
                let mut r = SalesRecord {
                    state: state.to_string(),
                    category: "Technology".to_string(),
                    segment: "Consumer".to_string(),
                    sales: Some(sales),
                    ..Default::default()
                };
                r.set_order_date(chrono::NaiveDate::from_ymd_opt(year, 6, 1));
                r
            })
            .collect();
        let mut state = AppState::default();
        state.set_cache(SalesCache::from_table("memory", SalesTable::from_records(records)));
        state
    }

    #[test]
    fn test_new_table_starts_with_empty_selection() {
        let state = loaded_state();
        assert!(state.visible_indices.is_empty());
        let summary = state.summary.as_ref().unwrap();
        assert_eq!(summary.kpis.transaction_count, 0);
    }

    #[test]
    fn test_toggles_recompute_summary() {
        let mut state = loaded_state();
        state.toggle_year(2016);
        assert!(state.visible_indices.is_empty());

        state.select_all_states();
        assert_eq!(state.visible_indices, vec![1, 2]);
        assert_eq!(state.summary.as_ref().unwrap().kpis.total_sales, 50);

        state.toggle_state("NY");
        assert_eq!(state.visible_indices, vec![2]);

        state.select_no_years();
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.visible_rows().map(|v| v.len()), Some(0));
    }

    #[test]
    fn test_open_missing_file_sets_status() {
        let mut state = AppState::default();
        state.open(Path::new("/no/such/sales.csv"));
        assert!(state.cache.is_none());
        assert!(state.status_message.unwrap().starts_with("Error"));
    }
}
