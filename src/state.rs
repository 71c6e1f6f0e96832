use crate::data::model::TypedTable;
use crate::data::stats::{ColumnScan, Stats, summarize, summarize_with};
use crate::insight::model::Insight;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Identifies one insight request so late replies can be recognised.
pub type AnalysisTicket = u64;

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded table (None until the user loads a file).
    pub table: Option<TypedTable>,

    /// Name of the file the table came from.
    pub file_name: Option<String>,

    /// Counts derived from `table` (cached).
    pub stats: Stats,

    /// How columns are classified for `stats`. Survives `reset`.
    pub column_scan: ColumnScan,

    /// Latest insight for the current table.
    pub insight: Option<Insight>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Ticket of the request whose reply will be accepted, while one is out.
    pending: Option<AnalysisTicket>,

    /// Last ticket handed out.
    last_ticket: AnalysisTicket,
}

impl AppState {
    /// Replace the current table with a freshly ingested one.
    pub fn load_table(&mut self, file_name: impl Into<String>, table: TypedTable) {
        self.stats = stats_for(&table, self.column_scan);
        self.table = Some(table);
        self.file_name = Some(file_name.into());
        self.insight = None;
        self.pending = None;
        self.status_message = None;
    }

    /// Switch column classification and recompute the cached counts.
    pub fn set_column_scan(&mut self, scan: ColumnScan) {
        if self.column_scan == scan {
            return;
        }
        self.column_scan = scan;
        if let Some(table) = &self.table {
            self.stats = stats_for(table, scan);
        }
    }

    /// Record a failed upload. The current table is left untouched.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Start a new analysis, superseding any request still in flight.
    /// Returns `None` when there is no table to analyse.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        self.table.as_ref()?;
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        Some(self.last_ticket)
    }

    /// Apply a reply if it belongs to the newest request. Stale replies are
    /// dropped and `false` is returned.
    pub fn finish_analysis(&mut self, ticket: AnalysisTicket, insight: Insight) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("Dropping stale insight for ticket {ticket}");
            return false;
        }
        self.pending = None;
        self.set_insight(insight);
        true
    }

    pub fn set_insight(&mut self, insight: Insight) {
        self.insight = Some(insight);
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the table and insight ("Upload New File").
    pub fn reset(&mut self) {
        self.table = None;
        self.file_name = None;
        self.stats = Stats::default();
        self.insight = None;
        self.pending = None;
        self.status_message = None;
    }
}

fn stats_for(table: &TypedTable, scan: ColumnScan) -> Stats {
    match scan {
        ColumnScan::FirstRow => summarize(table),
        ColumnScan::FullColumn => summarize_with(table, scan),
    }
}
