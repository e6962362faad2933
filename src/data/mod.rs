/// Data layer: core types, loading, quality checks and tabular export.
///
/// Architecture:
/// ```text
///  daned.props.json   daned.desc.json   daned.{train,dev,test}.tsv
///        │                  │                     │
///        ▼                  ▼                     ▼
///   ┌───────────────────────────────────────────────────┐
///   │  loader   parse sidecars, drop incomplete rows,    │
///   │           join qid → kg / description              │
///   └───────────────────────────────────────────────────┘
///        │
///        ▼
///   ┌────────────────┐      ┌──────────┐
///   │ PartitionTable  │ ───▶ │  table    │  Arrow RecordBatch / Parquet
///   └────────────────┘      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ quality   │  optional label-invariant check
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod quality;
pub mod table;
