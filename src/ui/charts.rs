use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use sales_dashboard::data::aggregate::{CrossTab, GroupTotal, MonthlySales};
use sales_dashboard::data::Month;
use sales_dashboard::view::{format_number, format_thousands, DashboardSummary};

use crate::color::{ColorMap, BAR_COLOR};
use crate::state::AppState;
use crate::ui::table;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPIs, charts and the filtered rows.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sales Dashboard");
            ui.add_space(8.0);

            kpi_row(ui, summary);
            ui.separator();

            monthly_chart(ui, &summary.monthly_sales);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                sub_category_chart(&mut cols[0], &summary.sub_category_sales);
                segment_chart(
                    &mut cols[1],
                    &summary.segment_contribution_pct,
                    summary.kpis.total_sales,
                    &state.segment_colors,
                );
            });
            ui.separator();

            ship_mode_chart(ui, &summary.ship_mode_by_category, &state.category_colors);
            ui.separator();

            if let Some(rows) = state.visible_rows() {
                egui::CollapsingHeader::new(RichText::new("Filtered rows").strong())
                    .id_salt("filtered_rows")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| table::rows_table(ui, &rows));
            }
        });
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, summary: &DashboardSummary) {
    let kpis = [
        ("Total Sales", summary.total_sales_text.as_str()),
        ("Average Sales", summary.average_sales_text.as_str()),
        ("Number of Transactions", summary.transactions_text.as_str()),
    ];
    ui.columns(kpis.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(kpis) {
            col.label(RichText::new(title).size(18.0).strong());
            col.label(RichText::new(value).size(22.0));
        }
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Line over Jan..Dec. Months without data break the line.
fn monthly_chart(ui: &mut Ui, monthly: &[MonthlySales]) {
    ui.label(RichText::new("Monthly Sales").strong());

    // Consecutive months with data form one segment.
    let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for m in monthly {
        match m.sales {
            Some(v) => current.push([m.month.index() as f64, v]),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    Plot::new("monthly_sales")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .include_x(0.0)
        .include_x(11.0)
        .x_axis_formatter(|mark: GridMark, _range| month_label(mark.value))
        .y_axis_label("Sales")
        .show(ui, |plot_ui| {
            for segment in segments {
                plot_ui.points(
                    Points::new(PlotPoints::from(segment.clone()))
                        .radius(3.0)
                        .color(BAR_COLOR),
                );
                plot_ui.line(Line::new(PlotPoints::from(segment)).color(BAR_COLOR).width(2.0));
            }
        });
}

fn month_label(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || !(0.0..12.0).contains(&rounded) {
        return String::new();
    }
    Month::ALL[rounded as usize].to_string()
}

/// Label integer positions of a categorical axis with their key.
fn category_label(keys: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    keys.get(rounded as usize).cloned().unwrap_or_default()
}

/// Horizontal bars, smallest sub-category at the bottom.
fn sub_category_chart(ui: &mut Ui, totals: &[GroupTotal]) {
    ui.label(RichText::new("Sales by Sub Category").strong());

    let keys: Vec<String> = totals.iter().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.value)
                .name(format!("{}: {}", g.key, format_number(g.value, 2)))
                .fill(BAR_COLOR)
        })
        .collect();

    Plot::new("sub_category_sales")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid([false, true])
        .y_axis_formatter(move |mark: GridMark, _range| category_label(&keys, mark.value))
        .x_axis_label("Sales")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7).name("Sales"));
        });
}

/// Share of overall sales per segment, in percent.
fn segment_chart(ui: &mut Ui, pct: &[GroupTotal], total_sales: i64, colors: &ColorMap) {
    ui.label(RichText::new("Segment Contribution to Overall Sales").strong());
    ui.label(format!("Sales ${}", format_thousands(total_sales)));

    let keys: Vec<String> = pct.iter().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = pct
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.value)
                .name(format!("{}: {:.1}%", g.key, g.value))
                .fill(colors.color_for(&g.key))
        })
        .collect();

    Plot::new("segment_contribution")
        .height(CHART_HEIGHT - 20.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&keys, mark.value))
        .y_axis_label("% of overall sales")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6).name("Contribution"));
        });
}

/// Row counts per ship mode, stacked by category.
fn ship_mode_chart(ui: &mut Ui, tab: &CrossTab, colors: &ColorMap) {
    ui.label(RichText::new("Category Distribution for Ship Mode").strong());

    let mut charts: Vec<BarChart> = Vec::with_capacity(tab.categories.len());
    for category in &tab.categories {
        let bars: Vec<Bar> = tab
            .ship_modes
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                let n = tab.count(mode, category);
                Bar::new(i as f64, n as f64).name(ship_mode_bar_name(tab, i, category))
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(category)
            .color(colors.color_for(category))
            .width(0.6)
            .stack_on(&below);
        charts.push(chart);
    }

    let keys = tab.ship_modes.clone();
    Plot::new("ship_mode_by_category")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&keys, mark.value))
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Hover text for one stacked bar, e.g. `Second Class / Technology: 2 of 5`.
fn ship_mode_bar_name(tab: &CrossTab, mode_index: usize, category: &str) -> String {
    let mode = &tab.ship_modes[mode_index];
    format!(
        "{mode} / {category}: {} of {}",
        tab.count(mode, category),
        tab.ship_mode_total(mode_index)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label_only_on_integer_marks() {
        assert_eq!(month_label(0.0), "Jan");
        assert_eq!(month_label(11.0), "Dec");
        assert_eq!(month_label(2.5), "");
        assert_eq!(month_label(12.0), "");
        assert_eq!(month_label(-1.0), "");
    }

    #[test]
    fn test_category_label() {
        let keys = vec!["Chairs".to_string(), "Phones".to_string()];
        assert_eq!(category_label(&keys, 1.0), "Phones");
        assert_eq!(category_label(&keys, 0.5), "");
        assert_eq!(category_label(&keys, 2.0), "");
    }

    #[test]
    fn test_ship_mode_bar_name_uses_crosstab_counts() {
        let tab = CrossTab {
            ship_modes: vec!["Standard Class".into(), "Same Day".into()],
            categories: vec!["Furniture".into(), "Technology".into()],
            counts: vec![vec![3, 2], vec![0, 1]],
        };
        assert_eq!(
            ship_mode_bar_name(&tab, 0, "Technology"),
            "Standard Class / Technology: 2 of 5"
        );
        assert_eq!(ship_mode_bar_name(&tab, 1, "Furniture"), "Same Day / Furniture: 0 of 1");
    }
}
