use super::model::{CellValue, TypedTable};

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// How a column is judged numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnScan {
    /// Look only at the first row's value (default, cheap).
    #[default]
    FirstRow,
    /// Every non-missing value must be numeric, and there must be a row.
    FullColumn,
}

/// Aggregate counts shown in the overview cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_rows: usize,
    pub total_cols: usize,
    pub numeric_cols: usize,
    pub categorical_cols: usize,
}

/// Summarise a table with the first-row heuristic.
pub fn summarize(table: &TypedTable) -> Stats {
    summarize_with(table, ColumnScan::FirstRow)
}

pub fn summarize_with(table: &TypedTable, scan: ColumnScan) -> Stats {
    let total_cols = table.headers.len();
    let numeric_cols = numeric_columns_with(table, scan).len();
    Stats {
        total_rows: table.rows.len(),
        total_cols,
        numeric_cols,
        categorical_cols: total_cols - numeric_cols,
    }
}

/// Headers classified as numeric by the first-row heuristic, in header order.
pub fn numeric_columns(table: &TypedTable) -> Vec<&str> {
    numeric_columns_with(table, ColumnScan::FirstRow)
}

fn numeric_columns_with(table: &TypedTable, scan: ColumnScan) -> Vec<&str> {
    let Some(first) = table.rows.first() else {
        return Vec::new();
    };

    table
        .headers
        .iter()
        .filter(|h| match scan {
            ColumnScan::FirstRow => table.cell(first, h).is_number(),
            ColumnScan::FullColumn => table.rows.iter().all(|row| {
                matches!(
                    table.cell(row, h),
                    CellValue::Number(_) | CellValue::Missing
                )
            }),
        })
        .map(String::as_str)
        .collect()
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// Values for the bar chart: the first numeric column and up to `limit` of
/// its numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub column: String,
    pub values: Vec<f64>,
    /// Largest value in the whole column (bar scale).
    pub max: f64,
}

pub fn chart_series(table: &TypedTable, limit: usize) -> Option<ChartSeries> {
    let column = numeric_columns(table).first()?.to_string();

    let all: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| table.cell(row, &column).as_f64())
        .collect();
    let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ChartSeries {
        values: all.into_iter().take(limit).collect(),
        column,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::ingest;

    #[test]
    fn test_scenario_a_stats() {
        let table = ingest("a.csv", "a,b\n1,x\n2,y\n").unwrap();
        assert_eq!(
            summarize(&table),
            Stats {
                total_rows: 2,
                total_cols: 2,
                numeric_cols: 1,
                categorical_cols: 1,
            }
        );
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let table = ingest("t.json", r#"[{"a":1,"b":"q"},{"a":"z","b":2}]"#).unwrap();
        assert_eq!(summarize(&table), summarize(&table));
    }

    #[test]
    fn test_headers_only_table() {
        let table = ingest("h.csv", "a,b\n").unwrap();
        let stats = summarize(&table);
        assert_eq!(stats.total_rows, 0);
        assert_eq!(stats.total_cols, 2);
        assert_eq!(stats.numeric_cols, 0);
        assert_eq!(stats.categorical_cols, 2);
    }

    #[test]
    fn test_empty_table_is_zeroed() {
        assert_eq!(summarize(&TypedTable::default()), Stats::default());
    }

    #[test]
    fn test_first_row_heuristic_vs_full_scan() {
        let table = ingest("m.csv", "a,b\n1,x\nnope,2\n3,y\n").unwrap();
        assert_eq!(summarize(&table).numeric_cols, 1);
        assert_eq!(summarize_with(&table, ColumnScan::FullColumn).numeric_cols, 0);

        let table = ingest("m.csv", "a,b\n1,x\n2\n").unwrap();
        assert_eq!(summarize_with(&table, ColumnScan::FullColumn).numeric_cols, 1);
    }

    #[test]
    fn test_chart_series_uses_first_numeric_column() {
        let table = ingest("c.csv", "name,score,age\na,10,1\nb,oops,2\nc,30,3\n").unwrap();
        let series = chart_series(&table, 20).unwrap();
        assert_eq!(series.column, "score");
        assert_eq!(series.values, vec![10.0, 30.0]);
        assert_eq!(series.max, 30.0);

        let series = chart_series(&table, 1).unwrap();
        assert_eq!(series.values, vec![10.0]);
        assert_eq!(series.max, 30.0);
    }

    #[test]
    fn test_chart_series_none_without_numeric_columns() {
        let table = ingest("c.csv", "name\nx\n").unwrap();
        assert!(chart_series(&table, 20).is_none());
    }
}
