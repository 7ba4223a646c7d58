/// Data layer: record types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesTable (dates coerced, Month/Year derived)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SalesCache  │  owns the canonical table for the process lifetime
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Year ∈ years AND State ∈ states → SalesView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs and grouped summaries
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use cache::SalesCache;
pub use error::LoadError;
pub use filter::FilterCriteria;
pub use model::{Month, SalesRecord, SalesTable, SalesView};
