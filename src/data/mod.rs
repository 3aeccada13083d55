/// Data layer: entities, loading, linking, filtering and report writing.
///
/// Architecture:
/// ```text
///  neos.csv        cad.json
///      │               │
///      ▼               ▼
///   ┌──────────────────────┐
///   │        loader        │  raw rows → NearEarthObject / CloseApproach
///   └──────────────────────┘
///              │
///              ▼
///   ┌──────────────────────┐
///   │      NeoDatabase     │  arenas, designation / name index, links
///   └──────────────────────┘
///              │
///              ▼
///   ┌──────────────────────┐
///   │        filter        │  criteria → predicates → lazy scan
///   └──────────────────────┘
///              │
///              ▼
///   ┌──────────────────────┐
///   │        writer        │  results → .csv / .json
///   └──────────────────────┘
/// ```

pub mod database;
pub mod filter;
pub mod loader;
pub mod model;
pub mod time;
pub mod writer;
