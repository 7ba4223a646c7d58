use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Month – derived from the order date
// ---------------------------------------------------------------------------

/// Calendar month, displayed as its three-letter English abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Canonical chart order, January first.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // `month0` is always in 0..12
        Self::ALL[date.month0() as usize]
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Zero-based position in [`Month::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One projected sales row.
///
/// `month` and `year` are derived from `order_date`; use
/// [`SalesRecord::set_order_date`] so the three stay jointly present or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesRecord {
    pub customer_id: String,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub ship_mode: String,
    pub segment: String,
    pub state: String,
    pub category: String,
    pub sub_category: String,
    pub month: Option<Month>,
    pub year: Option<i32>,
    pub sales: Option<f64>,
}

impl SalesRecord {
    /// Set the order date and re-derive `month` and `year` from it.
    pub fn set_order_date(&mut self, date: Option<NaiveDate>) {
        self.order_date = date;
        self.month = date.map(Month::of);
        self.year = date.map(|d| d.year());
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table with pre-computed filter options.
///
/// Immutable once built; filters and aggregations borrow it.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    years: BTreeSet<i32>,
    states: BTreeSet<String>,
    sales_total: f64,
}

impl SalesTable {
    /// Build the option indices and the full-table sales total.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let years = records.iter().filter_map(|r| r.year).collect();
        let states = records.iter().map(|r| r.state.clone()).collect();
        let sales_total = sum_ordered(records.iter().filter_map(|r| r.sales));
        SalesTable {
            records,
            years,
            states,
            sales_total,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct non-null years, ascending.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Distinct states, ascending.
    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    /// Sum of all non-null sales in the unfiltered table.
    pub fn sales_total(&self) -> f64 {
        self.sales_total
    }

    /// A view selecting every row.
    pub fn view_all(&self) -> SalesView<'_> {
        SalesView::from_indices(self, (0..self.records.len()).collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SalesView – a borrowed subset of a table
// ---------------------------------------------------------------------------

/// Read-only subset of a [`SalesTable`], in table order.
#[derive(Debug, Clone)]
pub struct SalesView<'a> {
    table: &'a SalesTable,
    indices: Vec<usize>,
}

impl<'a> SalesView<'a> {
    /// Wrap row indices of `table`. Indices out of range are dropped.
    pub fn from_indices(table: &'a SalesTable, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < table.len());
        SalesView { table, indices }
    }

    pub fn table(&self) -> &'a SalesTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn get(&self, position: usize) -> Option<&'a SalesRecord> {
        self.indices
            .get(position)
            .map(|&i| &self.table.records()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Sum in ascending value order so the result does not depend on row order.
pub(crate) fn sum_ordered(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
