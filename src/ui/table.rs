use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::TypedTable;

/// Rows shown in the preview grid.
pub const PREVIEW_ROWS: usize = 10;

/// Headers plus the first few rows, cells rendered with their display text.
pub fn preview(ui: &mut Ui, table: &TypedTable) {
    if table.headers.is_empty() {
        ui.label("No columns found.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0), table.headers.len())
                .header(22.0, |mut header| {
                    for h in &table.headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(h);
                        });
                    }
                })
                .body(|mut body| {
                    for row in table.head(PREVIEW_ROWS) {
                        body.row(20.0, |mut cells| {
                            for h in &table.headers {
                                cells.col(|ui: &mut Ui| {
                                    ui.label(table.cell(row, h).to_string());
                                });
                            }
                        });
                    }
                });
        });

    if table.is_empty() {
        ui.label(egui::RichText::new("The file has a header row but no records.").weak());
    } else if table.len() > PREVIEW_ROWS {
        ui.label(
            egui::RichText::new(format!("Showing {PREVIEW_ROWS} of {} rows", table.len())).weak(),
        );
    }
}
