use std::path::PathBuf;

use crate::data::stats::ColumnScan;

pub mod canvas;
pub mod panels;
pub mod plot;
pub mod table;

/// Something the user asked for while the frame was being drawn. Handled by
/// the app once all panels are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Show the native file picker.
    OpenFile,
    /// Load a file chosen via the picker or dropped onto the window.
    LoadPath(PathBuf),
    /// Dropped file delivered as bytes (web-style drop without a path).
    LoadBytes { name: String, bytes: Vec<u8> },
    /// Ask for (or refresh) the AI insight.
    Analyze,
    /// Change how columns are classified in the overview counts.
    SetColumnScan(ColumnScan),
    /// Discard the current table ("Upload New File").
    Reset,
}
