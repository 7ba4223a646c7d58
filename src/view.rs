//! The dashboard view model: everything the presenter draws, computed in one
//! pure pass from the full table and the current filter selection.

use serde::Serialize;

use crate::data::aggregate::{
    kpis, monthly_sales, segment_contribution_pct, ship_mode_by_category, sub_category_sales,
    CrossTab, GroupTotal, Kpis, MonthlySales,
};
use crate::data::filter::{apply, FilterCriteria};
use crate::data::model::{SalesTable, SalesView};

/// Owned summaries for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub kpis: Kpis,
    pub total_sales_text: String,
    pub average_sales_text: String,
    pub transactions_text: String,
    pub monthly_sales: Vec<MonthlySales>,
    pub sub_category_sales: Vec<GroupTotal>,
    pub segment_contribution_pct: Vec<GroupTotal>,
    pub ship_mode_by_category: CrossTab,
}

/// Summaries plus the filtered rows they were computed from.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub summary: DashboardSummary,
    pub rows: SalesView<'a>,
}

/// Filter `full` by `criteria` and aggregate the result.
pub fn render<'a>(full: &'a SalesTable, criteria: &FilterCriteria) -> ViewModel<'a> {
    let rows = apply(full, criteria);
    let kpis = kpis(&rows);

    let summary = DashboardSummary {
        total_sales_text: format!("US $ {}", format_thousands(kpis.total_sales)),
        average_sales_text: match kpis.average_sales {
            Some(avg) => format!("US $ {}", format_number(avg, 2)),
            None => "US $ —".to_string(),
        },
        transactions_text: kpis.transaction_count.to_string(),
        monthly_sales: monthly_sales(&rows),
        sub_category_sales: sub_category_sales(&rows),
        segment_contribution_pct: segment_contribution_pct(&rows, full),
        ship_mode_by_category: ship_mode_by_category(&rows),
        kpis,
    };

    log::debug!(
        "Rendered {} of {} rows for {} years / {} states",
        rows.len(),
        full.len(),
        criteria.years.len(),
        criteria.states.len()
    );

    ViewModel { summary, rows }
}

// ── Number formatting ─────────────────────────────────────────────────────────

/// Integer with `,` between thousands, e.g. `-1,234,567`.
pub fn format_thousands(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Fixed-point number with thousands separators, e.g. `1,234.50`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::new();
    // "-0.00" reads as zero
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::fixture;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-45210), "-45,210");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(433.33, 2), "433.33");
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_number(-9876.5, 1), "-9,876.5");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(1500.0, 0), "1,500");
    }

    #[test]
    fn test_render_full_selection() {
        let table = fixture();
        let vm = render(&table, &FilterCriteria::select_all(&table));

        assert_eq!(vm.rows.len(), 10);
        assert_eq!(vm.summary.total_sales_text, "US $ 5,500");
        assert_eq!(vm.summary.average_sales_text, "US $ 550.00");
        assert_eq!(vm.summary.transactions_text, "10");
        assert_eq!(vm.summary.monthly_sales.len(), 12);
        assert_eq!(vm.summary.sub_category_sales.len(), 3);
        assert_eq!(vm.summary.segment_contribution_pct.len(), 3);
        assert_eq!(vm.summary.ship_mode_by_category.ship_modes.len(), 4);
    }

    #[test]
    fn test_render_empty_selection_is_displayable() {
        let table = fixture();
        let vm = render(&table, &FilterCriteria::default());

        assert!(vm.rows.is_empty());
        assert_eq!(vm.summary.total_sales_text, "US $ 0");
        assert_eq!(vm.summary.average_sales_text, "US $ —");
        assert_eq!(vm.summary.transactions_text, "0");
        assert!(vm.summary.monthly_sales.iter().all(|m| m.sales.is_none()));
        assert!(vm.summary.sub_category_sales.is_empty());
        assert!(vm.summary.segment_contribution_pct.is_empty());
        assert!(vm.summary.ship_mode_by_category.is_empty());
    }

    #[test]
    fn test_render_is_pure() {
        let table = fixture();
        let criteria = FilterCriteria::new([2016], ["NY"]);
        let a = render(&table, &criteria);
        let b = render(&table, &criteria);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.rows.indices(), b.rows.indices());
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let table = fixture();
        let vm = render(&table, &FilterCriteria::new([2015], ["CA"]));
        let json = serde_json::to_value(&vm.summary).unwrap();
        assert_eq!(json["kpis"]["total_sales"], 1300);
        assert_eq!(json["monthly_sales"][0]["month"], "Jan");
        assert!(json["monthly_sales"][1]["sales"].is_null());
    }
}
