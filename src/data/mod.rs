/// Data layer: result files, entity discovery, binder runs and sequences.
///
/// Architecture:
/// ```text
///  base/<predictor>/<entity>.csv
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ resolver │   │  loader  │  parse file → ResultSet
///   └──────────┘   └──────────┘
///   entity names        │
///                       ├──────────────┐
///                       ▼              ▼
///                 ┌──────────┐   ┌──────────┐
///                 │  filter  │   │ sequence │  SequenceSummary
///                 └──────────┘   └──────────┘
///                 binder runs per allele
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod sequence;
