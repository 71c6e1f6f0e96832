use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::UiAction;
use crate::color;
use crate::data::stats::{ColumnScan, Stats};
use crate::insight::model::{DataQuality, Insight};
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                actions.push(UiAction::OpenFile);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Upload New File"))
                .clicked()
            {
                actions.push(UiAction::Reset);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("NeuralCanvas").strong().color(color::accent()));
        ui.label(RichText::new("AI-Powered Visual Data Explorer").weak());

        if let Some(name) = &state.file_name {
            ui.separator();
            ui.label(format!("{name}: {} records", state.stats.total_rows));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central content
// ---------------------------------------------------------------------------

/// Upload prompt when nothing is loaded, otherwise the full overview.
pub fn content(ui: &mut Ui, state: &AppState, max_upload_bytes: u64, actions: &mut Vec<UiAction>) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match &state.table {
            None => upload_prompt(ui, max_upload_bytes, actions),
            Some(data) => {
                stats_cards(ui, &state.stats);
                column_scan_toggle(ui, state.column_scan, actions);
                ui.add_space(12.0);

                match &state.insight {
                    Some(insight) => insight_panel(ui, insight),
                    None => analyze_button(ui, state.is_analyzing(), actions),
                }
                ui.add_space(12.0);

                section(ui, "Data Visualization", |ui: &mut Ui| plot::bar_chart(ui, data));
                ui.add_space(12.0);

                section(ui, "Data Preview", |ui: &mut Ui| table::preview(ui, data));
                ui.add_space(12.0);

                ui.horizontal(|ui: &mut Ui| {
                    if ui.button("Upload New File").clicked() {
                        actions.push(UiAction::Reset);
                    }
                    let label = if state.is_analyzing() {
                        "Analyzing…"
                    } else {
                        "Re-analyze"
                    };
                    if ui.button(label).clicked() {
                        actions.push(UiAction::Analyze);
                    }
                });
            }
        });
}

fn upload_prompt(ui: &mut Ui, max_upload_bytes: u64, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(60.0);
        ui.heading(RichText::new("Transform Data Into Insights").size(32.0).strong());
        ui.label(
            "Upload your CSV or JSON files and let AI discover patterns, anomalies, and actionable insights automatically",
        );
        ui.add_space(24.0);

        egui::Frame::group(ui.style())
            .fill(color::PANEL_FILL)
            .inner_margin(32.0)
            .show(ui, |ui: &mut Ui| {
                ui.heading("Upload Your Data");
                ui.label(format!(
                    "Support for CSV and JSON files up to {}MB",
                    max_upload_bytes / (1024 * 1024)
                ));
                ui.add_space(8.0);
                if ui
                    .button(RichText::new("Choose File").size(16.0))
                    .clicked()
                {
                    actions.push(UiAction::OpenFile);
                }
                ui.label(RichText::new("…or drop a file onto the window").weak());
            });
    });
}

fn stats_cards(ui: &mut Ui, stats: &Stats) {
    let cards = [
        ("Total Records", stats.total_rows),
        ("Columns", stats.total_cols),
        ("Numeric Fields", stats.numeric_cols),
        ("Categorical", stats.categorical_cols),
    ];
    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style())
                .fill(color::PANEL_FILL)
                .show(col, |ui: &mut Ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(value.to_string()).size(24.0).strong());
                    ui.label(RichText::new(label).weak());
                });
        }
    });
}

fn column_scan_toggle(ui: &mut Ui, current: ColumnScan, actions: &mut Vec<UiAction>) {
    let mut strict = current == ColumnScan::FullColumn;
    if ui
        .checkbox(&mut strict, "Strict column typing")
        .on_hover_text("Count a column as numeric only if every value in it is a number")
        .changed()
    {
        let scan = if strict {
            ColumnScan::FullColumn
        } else {
            ColumnScan::FirstRow
        };
        actions.push(UiAction::SetColumnScan(scan));
    }
}

fn analyze_button(ui: &mut Ui, analyzing: bool, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui: &mut Ui| {
        if analyzing {
            ui.add(egui::Spinner::new());
            ui.label("AI is analyzing your data...");
        } else if ui
            .button(RichText::new("✨ Analyze with AI").size(16.0))
            .clicked()
        {
            actions.push(UiAction::Analyze);
        }
    });
}

fn insight_panel(ui: &mut Ui, insight: &Insight) {
    section(ui, "AI Insights", |ui: &mut Ui| {
        ui.strong("Summary");
        ui.label(&insight.summary);
        ui.add_space(6.0);

        bullet_list(ui, "Key Findings", &insight.key_findings);
        bullet_list(ui, "Patterns Detected", &insight.patterns);
        bullet_list(ui, "Recommendations", &insight.recommendations);

        if !insight.interesting_columns.is_empty() {
            ui.label(format!(
                "Interesting columns: {}",
                insight.interesting_columns.join(", ")
            ));
        }

        ui.separator();
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Data Quality:");
            ui.label(
                RichText::new(&insight.data_quality)
                    .strong()
                    .color(quality_color(insight.quality())),
            );
        });
    });
}

fn bullet_list(ui: &mut Ui, title: &str, items: &[String]) {
    ui.strong(title);
    for item in items {
        ui.label(format!("• {item}"));
    }
    ui.add_space(6.0);
}

fn quality_color(quality: Option<DataQuality>) -> Color32 {
    match quality {
        Some(DataQuality::Excellent) => Color32::from_rgb(74, 222, 128),
        Some(DataQuality::Good) => color::accent(),
        Some(DataQuality::Fair) => Color32::from_rgb(250, 204, 21),
        Some(DataQuality::Poor) => Color32::from_rgb(248, 113, 113),
        None => Color32::GRAY,
    }
}

/// A titled translucent card.
fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style())
        .fill(color::PANEL_FILL)
        .inner_margin(16.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.heading(title);
            ui.add_space(4.0);
            add_contents(ui);
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}
