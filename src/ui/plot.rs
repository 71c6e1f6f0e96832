use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color;
use crate::data::model::TypedTable;
use crate::data::stats::chart_series;

/// Bars shown for the charted column.
pub const CHART_BARS: usize = 20;

// ---------------------------------------------------------------------------
// Bar chart (first numeric column)
// ---------------------------------------------------------------------------

/// Render the first numeric column's leading values as bars.
pub fn bar_chart(ui: &mut Ui, table: &TypedTable) {
    let Some(series) = chart_series(table, CHART_BARS) else {
        ui.label("No numeric columns to chart.");
        return;
    };

    let colors = color::bar_palette(series.values.len());
    let bars: Vec<Bar> = series
        .values
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (&value, fill))| Bar::new((i + 1) as f64, value).fill(fill).width(0.7))
        .collect();

    ui.strong(&series.column);

    Plot::new("bar_chart")
        .height(240.0)
        .x_axis_label("Row")
        .y_axis_label(series.column.clone())
        .include_y(0.0)
        .include_y(series.max)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&series.column));
        });
}
