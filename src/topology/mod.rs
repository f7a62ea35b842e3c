//! Static direction topology.
//!
//! Wraps the authored tables under `data/topology.json` (folders, descriptive
//! info, prerequisites) so the collector and builder share one validated,
//! read-only snapshot. Callers use `TopologyIndex` for lookups and the derived
//! `opens` edges.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{DirectionId, Stage, Status};
pub use index::TopologyIndex;
pub use model::{DirectionInfo, EMBEDDED_TOPOLOGY, TopologyTables, parse_topology};
