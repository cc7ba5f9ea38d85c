use std::collections::BTreeSet;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::{ColorMap, ACCENT, MUTED};
use crate::data::aggregate::{resilience_series, CohortPoint, RatioRow};
use crate::data::model::CategoryValue;

// ---------------------------------------------------------------------------
// Cohort ratio bar chart
// ---------------------------------------------------------------------------

/// Render a ratio table as a bar chart, one bar per cohort in table order.
///
/// `label_key` / `color_key` pick which of the row's group keys feed the
/// axis labels and the colour mapping (e.g. the world chart labels by
/// economy code but colours by region). When `highlight` names a cohort,
/// its bar gets the accent colour and every other bar the muted tone.
/// Cohorts with an undefined percentage ("no data") are not drawn.
pub fn ratio_bars(
    ui: &mut Ui,
    id: &str,
    rows: &[RatioRow],
    label_key: usize,
    color_key: usize,
    highlight: Option<&str>,
    x_label: &str,
    y_label: &str,
) {
    let tick_labels: Vec<String> = rows
        .iter()
        .map(|r| {
            r.keys
                .get(label_key)
                .map(|k| k.to_string())
                .unwrap_or_default()
        })
        .collect();

    let color_values: BTreeSet<CategoryValue> = rows
        .iter()
        .filter_map(|r| r.keys.get(color_key).cloned())
        .collect();
    let color_map = ColorMap::new(&color_values);

    let formatter_labels = tick_labels.clone();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_y(0.0)
        .height(280.0)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 0.001 || i < 0.0 {
                return String::new();
            }
            formatter_labels
                .get(i as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (i, row) in rows.iter().enumerate() {
                // Undefined cohorts carry no height to draw.
                let Some(pct) = row.percentage else { continue };

                let color = match highlight {
                    Some(focus) => {
                        if row.keys.iter().any(|k| *k == CategoryValue::str(focus)) {
                            ACCENT
                        } else {
                            MUTED
                        }
                    }
                    None => row
                        .keys
                        .get(color_key)
                        .map(|k| color_map.color_for(k))
                        .unwrap_or(MUTED),
                };

                let series_name = if color_key == label_key {
                    tick_labels[i].clone()
                } else {
                    row.keys
                        .get(color_key)
                        .map(|k| k.to_string())
                        .unwrap_or_default()
                };

                let bar = Bar::new(i as f64, pct).width(0.6).name(row.label());
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(series_name)
                        .color(color),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Resilience line chart
// ---------------------------------------------------------------------------

/// Render a cohort comparison as two probability lines across the ordered
/// cohorts: one for respondents with accounts, one for those without,
/// restricted to the positive outcome.
pub fn resilience_lines(ui: &mut Ui, id: &str, points: &[CohortPoint], x_label: &str, y_label: &str) {
    let groups: Vec<CategoryValue> = points
        .iter()
        .map(|p| p.group.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let to_line = |series: Vec<(CategoryValue, f64)>| -> PlotPoints {
        series
            .into_iter()
            .filter_map(|(group, probability)| {
                groups
                    .iter()
                    .position(|g| *g == group)
                    .map(|i| [i as f64, probability])
            })
            .collect()
    };

    let with_accounts = to_line(resilience_series(points, true));
    let without_accounts = to_line(resilience_series(points, false));

    let tick_labels: Vec<String> = groups.iter().map(|g| g.to_string()).collect();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_y(0.0)
        .include_y(1.0)
        .height(280.0)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 0.001 || i < 0.0 {
                return String::new();
            }
            tick_labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(with_accounts)
                    .name("With accounts")
                    .color(ACCENT)
                    .width(3.0),
            );
            plot_ui.line(
                Line::new(without_accounts)
                    .name("Without accounts")
                    .color(MUTED)
                    .width(3.0),
            );
        });
}
