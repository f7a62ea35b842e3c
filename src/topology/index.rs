//! Indexed, validated view of the topology tables.
//!
//! The index is built once at startup and never mutated. Loading is strict
//! about the prerequisite graph: unknown ids, self edges, and cycles abort the
//! run instead of producing a catalog with dangling edges. Missing folder or
//! prerequisite entries for a known direction are tolerated and read as empty.

use crate::topology::model::{DirectionInfo, EMBEDDED_TOPOLOGY, TopologyTables, parse_topology};
use crate::topology::DirectionId;
use anyhow::{Result, bail};
use std::collections::BTreeMap;

#[derive(Debug)]
/// Topology tables plus a lookup keyed by direction id.
pub struct TopologyIndex {
    tables: TopologyTables,
    by_id: BTreeMap<DirectionId, DirectionInfo>,
}

impl TopologyIndex {
    /// Load the tables compiled into the binary.
    pub fn load_embedded() -> Result<Self> {
        Self::from_tables(parse_topology(EMBEDDED_TOPOLOGY)?)
    }

    /// Validate tables and build the index.
    pub fn from_tables(tables: TopologyTables) -> Result<Self> {
        let by_id = build_index(&tables)?;
        validate_edges(&tables, &by_id)?;
        validate_acyclic(&tables)?;
        Ok(Self { tables, by_id })
    }

    /// Direction ids in authored order.
    pub fn ids(&self) -> impl Iterator<Item = &DirectionId> {
        self.tables.directions.iter().map(|info| &info.id)
    }

    pub fn len(&self) -> usize {
        self.tables.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.directions.is_empty()
    }

    pub fn info(&self, id: &DirectionId) -> Option<&DirectionInfo> {
        self.by_id.get(id)
    }

    /// Folder holding the direction's documents, if one is mapped.
    pub fn folder(&self, id: &DirectionId) -> Option<&str> {
        self.tables.folders.get(id).map(String::as_str)
    }

    /// Authored prerequisites; empty when the direction has no entry.
    pub fn requires(&self, id: &DirectionId) -> &[DirectionId] {
        self.tables
            .requires
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Directions listing `id` as a prerequisite, in prerequisite-table order.
    pub fn opens(&self, id: &DirectionId) -> Vec<DirectionId> {
        self.tables
            .requires
            .iter()
            .filter(|(_, deps)| deps.contains(id))
            .map(|(dependent, _)| dependent.clone())
            .collect()
    }
}

fn build_index(tables: &TopologyTables) -> Result<BTreeMap<DirectionId, DirectionInfo>> {
    let mut map = BTreeMap::new();
    for info in &tables.directions {
        if info.id.number().is_none() {
            bail!("direction id '{}' must be 'D' followed by digits", info.id);
        }
        if map.insert(info.id.clone(), info.clone()).is_some() {
            bail!("duplicate direction id {}", info.id);
        }
    }
    for id in tables.folders.keys() {
        if !map.contains_key(id) {
            bail!("folder table references unknown direction {id}");
        }
    }
    Ok(map)
}

fn validate_edges(
    tables: &TopologyTables,
    known: &BTreeMap<DirectionId, DirectionInfo>,
) -> Result<()> {
    for (id, deps) in &tables.requires {
        if !known.contains_key(id) {
            bail!("prerequisite table references unknown direction {id}");
        }
        for dep in deps {
            if dep == id {
                bail!("direction {id} requires itself");
            }
            if !known.contains_key(dep) {
                bail!("direction {id} requires unknown direction {dep}");
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn validate_acyclic(tables: &TopologyTables) -> Result<()> {
    let mut state: BTreeMap<&DirectionId, Visit> = BTreeMap::new();
    for start in tables.requires.keys() {
        let mut path = Vec::new();
        visit(start, tables, &mut state, &mut path)?;
    }
    Ok(())
}

fn visit<'a>(
    id: &'a DirectionId,
    tables: &'a TopologyTables,
    state: &mut BTreeMap<&'a DirectionId, Visit>,
    path: &mut Vec<&'a DirectionId>,
) -> Result<()> {
    match state.get(id) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            let cycle = path
                .iter()
                .skip_while(|step| **step != id)
                .map(|step| step.as_str())
                .chain(std::iter::once(id.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ");
            bail!("prerequisite cycle detected: {cycle}");
        }
        None => {}
    }

    state.insert(id, Visit::InProgress);
    path.push(id);
    if let Some(deps) = tables.requires.get(id) {
        for dep in deps {
            visit(dep, tables, state, path)?;
        }
    }
    path.pop();
    state.insert(id, Visit::Done);
    Ok(())
}
