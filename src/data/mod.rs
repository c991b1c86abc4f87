/// Data layer: NDVI tables, loading, date filtering and comparison pairing.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ObservationTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep rows inside the chosen date range
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  compare  │  baseline + alternative → styled ComparisonSeries
///   └──────────┘
/// ```

pub mod compare;
pub mod filter;
pub mod loader;
pub mod model;
