//! KPIs and grouped summaries over a filtered view.
//!
//! Null sales are skipped by every sum and mean. Group sums are computed
//! with [`sum_ordered`] so no output depends on row order.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{sum_ordered, Month, SalesRecord, SalesTable, SalesView};

// ── KPIs ──────────────────────────────────────────────────────────────────────

/// The three headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    /// Sum of sales, truncated toward zero.
    pub total_sales: i64,
    /// Mean sale rounded to cents; `None` when there is nothing to average.
    pub average_sales: Option<f64>,
    /// Number of rows with a non-null sale.
    pub transaction_count: usize,
}

pub fn kpis(view: &SalesView<'_>) -> Kpis {
    Kpis {
        total_sales: total_sales(view),
        average_sales: average_sales(view),
        transaction_count: transaction_count(view),
    }
}

pub fn total_sales(view: &SalesView<'_>) -> i64 {
    sales_sum(view).trunc() as i64
}

pub fn average_sales(view: &SalesView<'_>) -> Option<f64> {
    let count = transaction_count(view);
    if count == 0 {
        return None;
    }
    let mean = sales_sum(view) / count as f64;
    Some(round_cents(mean))
}

pub fn transaction_count(view: &SalesView<'_>) -> usize {
    view.iter().filter(|r| r.sales.is_some()).count()
}

fn sales_sum(view: &SalesView<'_>) -> f64 {
    sum_ordered(view.iter().filter_map(|r| r.sales))
}

/// Two decimals, ties to even (`5.625` → `5.62`).
fn round_cents(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

// ── Grouped summaries ─────────────────────────────────────────────────────────

/// Sales for one calendar month; `None` when no filtered row falls in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: Month,
    pub sales: Option<f64>,
}

/// A group key with its aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Sum sales per key. Keys come back in ascending order. Rows with an
/// empty key belong to no group.
fn group_sum<'a>(
    view: &SalesView<'a>,
    key: impl Fn(&'a SalesRecord) -> &'a str,
) -> BTreeMap<&'a str, f64> {
    let mut groups: BTreeMap<&'a str, Vec<f64>> = BTreeMap::new();
    for record in view.iter() {
        let k = key(record);
        if k.is_empty() {
            continue;
        }
        groups.entry(k).or_default().extend(record.sales);
    }
    groups
        .into_iter()
        .map(|(k, values)| (k, sum_ordered(values.into_iter())))
        .collect()
}

/// Twelve entries, January to December. Rows without a month are ignored.
pub fn monthly_sales(view: &SalesView<'_>) -> Vec<MonthlySales> {
    let mut groups: BTreeMap<Month, Vec<f64>> = BTreeMap::new();
    for record in view.iter() {
        if let Some(month) = record.month {
            groups.entry(month).or_default().extend(record.sales);
        }
    }
    Month::ALL
        .iter()
        .map(|&month| MonthlySales {
            month,
            sales: groups
                .remove(&month)
                .map(|values| sum_ordered(values.into_iter())),
        })
        .collect()
}

/// Sales per sub-category, smallest first. Ties keep name order.
pub fn sub_category_sales(view: &SalesView<'_>) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = group_sum(view, |r| r.sub_category.as_str())
        .into_iter()
        .map(|(key, value)| GroupTotal {
            key: key.to_string(),
            value,
        })
        .collect();
    totals.sort_by(|a, b| a.value.total_cmp(&b.value));
    totals
}

/// Each segment's filtered sales as a percentage of the whole table's sales.
///
/// The denominator is `full.sales_total()`, not the filtered total, so the
/// percentages only reach 100 when the filter selects everything. A zero
/// denominator yields 0 for every segment.
pub fn segment_contribution_pct(view: &SalesView<'_>, full: &SalesTable) -> Vec<GroupTotal> {
    let denominator = full.sales_total();
    group_sum(view, |r| r.segment.as_str())
        .into_iter()
        .map(|(key, sum)| GroupTotal {
            key: key.to_string(),
            value: if denominator == 0.0 {
                0.0
            } else {
                sum / denominator * 100.0
            },
        })
        .collect()
}

// ── Ship mode × category frequency table ─────────────────────────────────────

/// Row counts for every (ship mode, category) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    /// Ship modes by total count, largest first.
    pub ship_modes: Vec<String>,
    /// Categories in name order.
    pub categories: Vec<String>,
    /// `counts[i][j]` is the count for `ship_modes[i]` and `categories[j]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn count(&self, ship_mode: &str, category: &str) -> usize {
        let i = self.ship_modes.iter().position(|m| m == ship_mode);
        let j = self.categories.iter().position(|c| c == category);
        match (i, j) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn ship_mode_total(&self, index: usize) -> usize {
        self.counts.get(index).map(|row| row.iter().sum()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.ship_modes.is_empty()
    }
}

pub fn ship_mode_by_category(view: &SalesView<'_>) -> CrossTab {
    let mut pairs: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in view.iter() {
        *pairs
            .entry((record.ship_mode.as_str(), record.category.as_str()))
            .or_default() += 1;
    }

    let mut mode_totals: BTreeMap<&str, usize> = BTreeMap::new();
    let mut categories: Vec<&str> = Vec::new();
    for (&(mode, category), &n) in &pairs {
        *mode_totals.entry(mode).or_default() += n;
        categories.push(category);
    }
    categories.sort_unstable();
    categories.dedup();

    let mut ship_modes: Vec<(&str, usize)> = mode_totals.into_iter().collect();
    // stable: equal totals stay in name order
    ship_modes.sort_by(|a, b| b.1.cmp(&a.1));

    let counts = ship_modes
        .iter()
        .map(|&(mode, _)| {
            categories
                .iter()
                .map(|&category| pairs.get(&(mode, category)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    CrossTab {
        ship_modes: ship_modes.into_iter().map(|(m, _)| m.to_string()).collect(),
        categories: categories.into_iter().map(str::to_string).collect(),
        counts,
    }
}
