//! Deserializable representation of `data/topology.json`.
//!
//! The file carries the three authored tables: direction descriptions (in
//! authored order), the folder each direction's documents live in, and the
//! prerequisite lists. Use `TopologyIndex` for validated lookups; these structs
//! are the raw surface.

use crate::topology::identity::{DirectionId, Stage};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Topology tables compiled into the binary.
pub const EMBEDDED_TOPOLOGY: &str = include_str!("../../data/topology.json");

#[derive(Clone, Debug, Deserialize)]
/// The three parallel tables keyed by direction id.
pub struct TopologyTables {
    pub directions: Vec<DirectionInfo>,
    #[serde(default)]
    pub folders: BTreeMap<DirectionId, String>,
    #[serde(default)]
    pub requires: BTreeMap<DirectionId, Vec<DirectionId>>,
}

#[derive(Clone, Debug, Deserialize)]
/// Descriptive metadata of one direction.
pub struct DirectionInfo {
    pub id: DirectionId,
    pub name: String,
    pub block: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

/// Parse topology tables from JSON text without consistency checks.
pub fn parse_topology(raw: &str) -> Result<TopologyTables> {
    serde_json::from_str(raw).context("parsing topology tables")
}
