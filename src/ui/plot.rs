use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, PlotUi, Points};

use crate::color::LabelColors;
use crate::data::compare::{ComparisonSeries, LinePattern};
use crate::data::model::ObservationTable;

// ---------------------------------------------------------------------------
// Date axis helpers
// ---------------------------------------------------------------------------

/// Plot x coordinate of a date (days from the common era).
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn date_label(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn show_ndvi_plot(ui: &mut Ui, id: &str, add_contents: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .height(280.0)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("NDVI")
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .label_formatter(|name: &str, value: &PlotPoint| {
            let date = date_label(value.x);
            if name.is_empty() {
                format!("{date}\nNDVI {:.3}", value.y)
            } else {
                format!("{name}\n{date}\nNDVI {:.3}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, add_contents);
}

// ---------------------------------------------------------------------------
// Single-table chart
// ---------------------------------------------------------------------------

/// One line with markers per label, in file order.
pub fn ndvi_chart(ui: &mut Ui, id: &str, table: &ObservationTable) {
    let labels = table.labels();
    let colors = LabelColors::new(labels.iter().copied());

    show_ndvi_plot(ui, id, |plot_ui| {
        for label in &labels {
            let coords: Vec<[f64; 2]> = table
                .series_for(label)
                .into_iter()
                .map(|(date, v)| [date_to_x(date), v])
                .collect();
            let color = colors.color_for(label);

            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(*label)
                    .color(color)
                    .width(1.5),
            );
            plot_ui.points(Points::new(coords).name(*label).color(color).radius(2.5));
        }
    });
}

// ---------------------------------------------------------------------------
// Comparison chart
// ---------------------------------------------------------------------------

fn line_style(pattern: LinePattern) -> LineStyle {
    match pattern {
        LinePattern::Solid => LineStyle::Solid,
        LinePattern::Dotted => LineStyle::dotted_dense(),
    }
}

/// Baseline (dotted) and alternative (solid) lines, coloured by zone.
pub fn comparison_chart(ui: &mut Ui, id: &str, series: &[ComparisonSeries]) {
    show_ndvi_plot(ui, id, |plot_ui| {
        for s in series {
            let points: PlotPoints = s
                .points
                .iter()
                .map(|&(date, v)| [date_to_x(date), v])
                .collect();

            plot_ui.line(
                Line::new(points)
                    .name(&s.name)
                    .color(s.color.to_color32())
                    .style(line_style(s.pattern))
                    .width(1.5),
            );
        }
    });
}
