//! Records emitted into `data.json`.
//!
//! Field order matches the document layout consumers read; serde writes
//! struct fields in declaration order, so reordering here reorders the output.

use crate::topology::{DirectionId, Stage, Status};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One technology document, parsed.
pub struct Technology {
    pub id: String,
    pub name: String,
    pub process: String,
    pub stage: Stage,
    pub difficulty: i64,
    pub time_to_learn: String,
    pub status: Status,
    pub description: String,
    pub content: String,
    pub file: String,
    pub related: Vec<RelatedTechnology>,
    pub sections: Vec<String>,
    pub stats: TechnologyStats,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Row of the related-technologies table.
pub struct RelatedTechnology {
    pub id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Counters derived from the document body.
pub struct TechnologyStats {
    pub steps: usize,
    pub checkpoints: usize,
    pub materials: usize,
    pub tools: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A direction with its technologies and graph edges.
pub struct Direction {
    pub id: DirectionId,
    pub name: String,
    pub block: String,
    pub stages: Vec<Stage>,
    pub requires: Vec<DirectionId>,
    pub opens: Vec<DirectionId>,
    pub technologies: Vec<Technology>,
    pub stats: DirectionStats,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionStats {
    pub total: usize,
    pub by_stage: StageCounts,
    pub by_status: StatusCounts,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Technologies per known stage; unknown stages are only in `total`.
pub struct StageCounts {
    #[serde(rename = "черновая")]
    pub rough: usize,
    #[serde(rename = "чистовая")]
    pub finish: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub draft: usize,
    pub review: usize,
    pub approved: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// The whole compiled document.
pub struct Catalog {
    pub meta: CatalogMeta,
    pub directions: Vec<Direction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeta {
    pub generated: String,
    pub total_directions: usize,
    pub total_technologies: usize,
}

impl DirectionStats {
    /// Count technologies by stage and status.
    pub fn from_technologies(technologies: &[Technology]) -> Self {
        let mut stats = DirectionStats {
            total: technologies.len(),
            ..Default::default()
        };
        for tech in technologies {
            match tech.stage {
                Stage::Rough => stats.by_stage.rough += 1,
                Stage::Finish => stats.by_stage.finish += 1,
                Stage::Other(_) => {}
            }
            match tech.status {
                Status::Draft => stats.by_status.draft += 1,
                Status::Review => stats.by_status.review += 1,
                Status::Approved => stats.by_status.approved += 1,
                Status::Other(_) => {}
            }
        }
        stats
    }
}
