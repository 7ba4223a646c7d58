use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use sales_dashboard::data::loader::DATE_FORMAT;
use sales_dashboard::data::{SalesRecord, SalesView};

const HEADERS: [&str; 11] = [
    "Customer ID",
    "Order Date",
    "Ship Date",
    "Ship Mode",
    "Segment",
    "State",
    "Category",
    "Sub-Category",
    "Month",
    "Year",
    "Sales",
];

const ROW_HEIGHT: f32 = 18.0;

/// Cell text for one record, in [`HEADERS`] order. Nulls render empty.
fn cells(record: &SalesRecord) -> [String; 11] {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    [
        record.customer_id.clone(),
        date(record.order_date),
        date(record.ship_date),
        record.ship_mode.clone(),
        record.segment.clone(),
        record.state.clone(),
        record.category.clone(),
        record.sub_category.clone(),
        record.month.map(|m| m.to_string()).unwrap_or_default(),
        record.year.map(|y| y.to_string()).unwrap_or_default(),
        record.sales.map(|s| format!("{s:.2}")).unwrap_or_default(),
    ]
}

/// Virtualised table of the filtered rows.
pub fn rows_table(ui: &mut Ui, rows: &SalesView<'_>) {
    if rows.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let Some(record) = rows.get(row.index()) else {
                    return;
                };
                for text in cells(record) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_render_nulls_empty() {
        let mut r = SalesRecord {
            customer_id: "A".into(),
            sales: Some(12.5),
            ..Default::default()
        };
        r.set_order_date(chrono::NaiveDate::from_ymd_opt(2016, 11, 8));
        let c = cells(&r);
        assert_eq!(c[1], "08/11/2016");
        assert_eq!(c[2], "");
        assert_eq!(c[8], "Nov");
        assert_eq!(c[9], "2016");
        assert_eq!(c[10], "12.50");

        r.set_order_date(None);
        r.sales = None;
        let c = cells(&r);
        assert_eq!(c[1], "");
        assert_eq!(c[8], "");
        assert_eq!(c[10], "");
    }
}
