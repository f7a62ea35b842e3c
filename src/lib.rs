//! Shared library for the renovation catalog compiler.
//!
//! The crate turns the `технологии/<direction>/T-*.md` document tree into the
//! single `app/public/data.json` catalog the web app reads. Public functions
//! here form the contract the `build-data` binary depends on: repository
//! discovery, the input/output layout, and the compile pipeline (topology ->
//! collector -> builder -> writer).

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod builder;
pub mod collector;
pub mod markdown;
pub mod output;
pub mod record;
pub mod topology;

pub use builder::{build_catalog, build_catalog_at};
pub use collector::{collect_technologies, parse_technology};
pub use output::write_catalog;
pub use record::{
    Catalog, CatalogMeta, Direction, DirectionStats, RelatedTechnology, StageCounts,
    StatusCounts, Technology, TechnologyStats,
};
pub use topology::{DirectionId, DirectionInfo, Stage, Status, TopologyIndex};

/// Folder under the repository root holding one subfolder per direction.
pub const TECHNOLOGIES_DIR: &str = "технологии";
/// Catalog destination relative to the repository root.
pub const OUTPUT_PATH: &str = "app/public/data.json";

/// Input and output locations anchored at a repository root.
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn technologies_dir(&self) -> PathBuf {
        self.root.join(TECHNOLOGIES_DIR)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(OUTPUT_PATH)
    }
}

/// Run the whole pipeline for `layout` and write the result.
///
/// Returns the catalog that was written so callers can report counts.
pub fn compile_catalog(layout: &CatalogLayout) -> Result<Catalog> {
    let topology = TopologyIndex::load_embedded()?;
    let catalog = build_catalog(layout, &topology)?;
    write_catalog(&layout.output_path(), &catalog)?;
    Ok(catalog)
}

/// Returns true when `candidate` holds the technologies tree.
fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(TECHNOLOGIES_DIR).is_dir()
}

/// Accept a baked-in root only when it actually holds the technologies tree.
fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root.
///
/// Search order: climb up from the current directory, then from the current
/// executable, looking for the technologies folder; finally fall back to the
/// build-time hint (the crate's own directory) if that holds the folder too.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("CATALOG_ROOT_HINT") {
        if let Some(root) = repo_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate the repository root: no '{TECHNOLOGIES_DIR}' folder above the current directory"
    );
}
