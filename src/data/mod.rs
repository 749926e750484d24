/// Data layer: core types, loading, filtering and menu options.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataStore  │  one validated Table per DatasetKind
///   └───────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │  filter   │ keys →     │ options   │ distinct values → menus
///   └──────────┘ Bundle      └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod options;
