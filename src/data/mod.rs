/// Data layer: the survey table and the cohort aggregation pipeline.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SurveyDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ DatasetAccessor  │  read-once cache, country/region subsets
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  relabel codes → Vec<CohortRow> (per-call copy)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  cohort ratios and conditional probabilities
///   └──────────┘
/// ```
///
/// Everything below the accessor is pure: aggregation never writes back
/// into the cached table.

pub mod accessor;
pub mod aggregate;
pub mod derive;
pub mod error;
pub mod loader;
pub mod model;
