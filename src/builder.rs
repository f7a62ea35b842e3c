//! Catalog assembly across all directions.
//!
//! Directions are visited in authored order, then re-sorted by the numeric
//! part of their id so the output order never depends on how the tables were
//! written.

use crate::CatalogLayout;
use crate::collector::collect_technologies;
use crate::record::{Catalog, CatalogMeta, Direction, DirectionStats};
use crate::topology::{DirectionId, TopologyIndex};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

/// Build the catalog stamped with the current UTC time.
pub fn build_catalog(layout: &CatalogLayout, topology: &TopologyIndex) -> Result<Catalog> {
    let generated = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    build_catalog_at(layout, topology, generated)
}

/// Build the catalog with an explicit `meta.generated` value.
pub fn build_catalog_at(
    layout: &CatalogLayout,
    topology: &TopologyIndex,
    generated: String,
) -> Result<Catalog> {
    let mut directions = Vec::with_capacity(topology.len());
    for id in topology.ids() {
        directions.push(build_direction(layout, topology, id)?);
    }

    directions.sort_by_key(|direction| direction.id.number());
    let total_technologies = directions.iter().map(|d| d.technologies.len()).sum();

    Ok(Catalog {
        meta: CatalogMeta {
            generated,
            total_directions: directions.len(),
            total_technologies,
        },
        directions,
    })
}

fn build_direction(
    layout: &CatalogLayout,
    topology: &TopologyIndex,
    id: &DirectionId,
) -> Result<Direction> {
    let info = topology
        .info(id)
        .with_context(|| format!("direction {id} has no description"))?;
    let technologies = collect_technologies(layout, topology, id)
        .with_context(|| format!("collecting technologies for {id}"))?;
    tracing::debug!(direction = %id, technologies = technologies.len(), "built direction");

    Ok(Direction {
        id: id.clone(),
        name: info.name.clone(),
        block: info.block.clone(),
        stages: info.stages.clone(),
        requires: topology.requires(id).to_vec(),
        opens: topology.opens(id),
        stats: DirectionStats::from_technologies(&technologies),
        technologies,
    })
}
