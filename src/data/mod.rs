/// Data layer: core types, loading, cross-filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, distinct ages / races
///   └──────────┘
///        │                         ┌───────────┐
///        ├──────────────────────── │  filter    │  selection → filtered records
///        ▼                         └───────────┘
///   ┌───────────┐                        │
///   │ aggregate  │ ◄─────────────────────┘
///   └───────────┘  count by key / key pair
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  pie slices, bars, heatmap grid
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
