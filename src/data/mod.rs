/// Data layer: core types, ingestion, and summary statistics.
///
/// Architecture:
/// ```text
///    .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → TypedTable (per-cell type inference)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ TypedTable │  ordered headers, header → value rows
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  row / column counts, numeric vs. categorical
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
