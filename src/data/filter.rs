use std::collections::BTreeSet;

use super::model::{SalesRecord, SalesTable, SalesView};

// ---------------------------------------------------------------------------
// Filter predicate: which years and states are selected
// ---------------------------------------------------------------------------

/// The user's Year and State selection.
///
/// Both sets are strict membership tests: an empty set selects nothing, so
/// the default (nothing ticked) filters every row out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub years: BTreeSet<i32>,
    pub states: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        states: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        FilterCriteria {
            years: years.into_iter().collect(),
            states: states.into_iter().map(Into::into).collect(),
        }
    }

    /// Every year and state the table offers.
    pub fn select_all(table: &SalesTable) -> Self {
        FilterCriteria {
            years: table.years().clone(),
            states: table.states().clone(),
        }
    }

    /// A record passes when its year is selected AND its state is selected.
    /// A record without a year never passes.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.year.is_some_and(|y| self.years.contains(&y)) && self.states.contains(&record.state)
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }

    pub fn toggle_state(&mut self, state: &str) {
        if !self.states.remove(state) {
            self.states.insert(state.to_string());
        }
    }
}

/// Return indices of records that pass the criteria, in table order.
pub fn filtered_indices(table: &SalesTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// The filtered view of `table` under `criteria`.
pub fn apply<'a>(table: &'a SalesTable, criteria: &FilterCriteria) -> SalesView<'a> {
    SalesView::from_indices(table, filtered_indices(table, criteria))
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;

    /// Ten rows over years {2015, 2016} and states {CA, NY}, sales 100..=1000.
    pub(crate) fn fixture() -> SalesTable {
        let rows = [
            (2015, 1, "CA", "Consumer", "Phones", "Technology", "Standard Class"),
            (2015, 2, "NY", "Corporate", "Chairs", "Furniture", "Second Class"),
            (2016, 3, "CA", "Consumer", "Binders", "Office Supplies", "Standard Class"),
            (2015, 4, "CA", "Home Office", "Phones", "Technology", "First Class"),
            (2016, 5, "NY", "Consumer", "Chairs", "Furniture", "Standard Class"),
            (2015, 6, "NY", "Corporate", "Binders", "Office Supplies", "Same Day"),
            (2016, 7, "CA", "Corporate", "Phones", "Technology", "Second Class"),
            (2015, 8, "CA", "Consumer", "Binders", "Office Supplies", "Standard Class"),
            (2016, 9, "NY", "Home Office", "Chairs", "Furniture", "First Class"),
            (2016, 1, "CA", "Consumer", "Phones", "Technology", "Standard Class"),
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(year, month, state, segment, sub, category, mode))| {
                let mut r = SalesRecord {
                    customer_id: format!("C-{i}"),
                    ship_mode: mode.to_string(),
                    segment: segment.to_string(),
                    state: state.to_string(),
                    category: category.to_string(),
                    sub_category: sub.to_string(),
                    sales: Some(100.0 * (i as f64 + 1.0)),
                    ..Default::default()
                };
                r.set_order_date(NaiveDate::from_ymd_opt(year, month, 15));
                r
            })
            .collect();
        SalesTable::from_records(records)
    }

    #[test]
    fn test_apply_selects_exact_rows() {
        let table = fixture();
        let view = apply(&table, &FilterCriteria::new([2015], ["CA"]));
        // rows 0, 3, 7 are 2015/CA
        assert_eq!(view.indices(), &[0, 3, 7]);
        for r in view.iter() {
            assert_eq!(r.year, Some(2015));
            assert_eq!(r.state, "CA");
        }
    }

    #[test]
    fn test_empty_year_set_selects_nothing() {
        // Strict membership: no year ticked means no rows, not all rows.
        let table = fixture();
        let criteria = FilterCriteria::new([], ["CA", "NY"]);
        assert!(apply(&table, &criteria).is_empty());
    }

    #[test]
    fn test_empty_state_set_selects_nothing() {
        let table = fixture();
        let criteria = FilterCriteria::new([2015, 2016], Vec::<String>::new());
        assert!(apply(&table, &criteria).is_empty());
    }

    #[test]
    fn test_default_criteria_is_empty_selection() {
        let table = fixture();
        assert!(apply(&table, &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn test_select_all_is_identity() {
        let table = fixture();
        let view = apply(&table, &FilterCriteria::select_all(&table));
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn test_undated_rows_never_match() {
        let mut r = SalesRecord {
            state: "CA".into(),
            sales: Some(1.0),
            ..Default::default()
        };
        r.set_order_date(None);
        let table = SalesTable::from_records(vec![r]);
        let criteria = FilterCriteria::new([2015, 2016], ["CA"]);
        assert!(apply(&table, &criteria).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_year(2016);
        criteria.toggle_state("NY");
        assert!(criteria.years.contains(&2016));
        assert!(criteria.states.contains("NY"));
        criteria.toggle_year(2016);
        criteria.toggle_state("NY");
        assert_eq!(criteria, FilterCriteria::default());
    }
}
