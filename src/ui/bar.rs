use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color;
use crate::data::views::CategoryMark;

const BAR_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Age-group bar chart
// ---------------------------------------------------------------------------

/// Draw the bars in the order given. Returns the label of a bar clicked this
/// frame.
pub fn age_bar_chart(ui: &mut Ui, bars: &[CategoryMark]) -> Option<String> {
    if bars.is_empty() {
        ui.label("No age groups to show.");
        return None;
    }

    let chart_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.count as f64)
                .name(&b.label)
                .width(BAR_WIDTH)
                .fill(if b.selected { color::SELECTED } else { color::BAR })
        })
        .collect();

    let tooltips: Vec<String> = bars.iter().map(CategoryMark::tooltip).collect();
    let chart = BarChart::new(chart_bars).element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
        bar_index(bar.argument, tooltips.len())
            .and_then(|i| tooltips.get(i).cloned())
            .unwrap_or_default()
    }));

    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let n_labels = labels.len();

    let response = Plot::new("age_bar_chart")
        .height(300.0)
        .y_axis_label("Cases")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON {
                return String::new();
            }
            bar_index(i, n_labels)
                .and_then(|i| labels.get(i).cloned())
                .unwrap_or_default()
        })
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.pointer_coordinate()
        });

    if !response.response.clicked() {
        return None;
    }
    let point = response.inner?;
    let idx = bar_index(point.x, bars.len())?;
    let bar = bars.get(idx)?;
    let inside = (point.x - idx as f64).abs() <= BAR_WIDTH / 2.0
        && point.y >= 0.0
        && point.y <= bar.count as f64;
    inside.then(|| bar.label.clone())
}

/// Bar slot nearest to plot coordinate `x`, if one exists.
fn bar_index(x: f64, len: usize) -> Option<usize> {
    let i = x.round();
    if i < 0.0 || i >= len as f64 {
        return None;
    }
    Some(i as usize)
}
