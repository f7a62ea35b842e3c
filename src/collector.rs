//! Per-direction technology collection.
//!
//! Reads every `T-*.md` document directly inside a direction's folder and turns
//! it into a `Technology`. A direction without a folder simply has no
//! technologies yet; unreadable files abort the run with the path attached.

use crate::markdown::{
    count_checkpoints, count_materials, count_steps, count_tools, extract_body,
    extract_description, extract_related, extract_section_titles, parse_difficulty,
    parse_metadata_block,
};
use crate::record::{Technology, TechnologyStats};
use crate::topology::{DirectionId, Stage, Status, TopologyIndex};
use crate::{CatalogLayout, TECHNOLOGIES_DIR};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const TECHNOLOGY_PREFIX: &str = "T-";
const DOCUMENT_EXTENSION: &str = ".md";

/// Collect the technologies of one direction, sorted by id.
pub fn collect_technologies(
    layout: &CatalogLayout,
    topology: &TopologyIndex,
    id: &DirectionId,
) -> Result<Vec<Technology>> {
    let Some(folder) = topology.folder(id) else {
        tracing::debug!(direction = %id, "no folder mapped");
        return Ok(Vec::new());
    };
    let dir = layout.technologies_dir().join(folder);
    if !dir.is_dir() {
        tracing::debug!(direction = %id, path = %dir.display(), "folder missing");
        return Ok(Vec::new());
    }

    let mut technologies = Vec::new();
    for file_name in technology_files(&dir)? {
        let path = dir.join(&file_name);
        let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        let rel_path = format!("{TECHNOLOGIES_DIR}/{folder}/{file_name}");
        technologies.push(parse_technology(&text, &file_name, rel_path));
    }

    technologies.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(direction = %id, count = technologies.len(), "collected technologies");
    Ok(technologies)
}

/// Names of `T-*.md` entries directly inside `dir`, in name order.
///
/// Only subdirectories are skipped; anything else with a matching name is
/// read, so a broken link surfaces as a read error.
fn technology_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        if entry.path().is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with(TECHNOLOGY_PREFIX) && name.ends_with(DOCUMENT_EXTENSION) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Build a technology record from document text.
///
/// `file_name` supplies the id and name fallbacks; `rel_path` is recorded
/// verbatim in `file`.
pub fn parse_technology(text: &str, file_name: &str, rel_path: String) -> Technology {
    let metadata = parse_metadata_block(text);
    if metadata.is_empty() {
        tracing::debug!(file = %rel_path, "no metadata block, using defaults");
    }
    let stem = file_name
        .strip_suffix(DOCUMENT_EXTENSION)
        .unwrap_or(file_name);
    let body = extract_body(text);

    Technology {
        id: field(&metadata, "id").unwrap_or(stem).to_string(),
        name: field(&metadata, "name").unwrap_or(stem).to_string(),
        process: field(&metadata, "process").unwrap_or_default().to_string(),
        stage: field(&metadata, "stage")
            .map(Stage::from_label)
            .unwrap_or_default(),
        difficulty: parse_difficulty(field(&metadata, "difficulty")),
        time_to_learn: field(&metadata, "time_to_learn")
            .unwrap_or_default()
            .to_string(),
        status: field(&metadata, "status")
            .map(Status::from_label)
            .unwrap_or_default(),
        description: extract_description(text),
        related: extract_related(&body),
        sections: extract_section_titles(&body),
        stats: TechnologyStats {
            steps: count_steps(&body),
            checkpoints: count_checkpoints(&body),
            materials: count_materials(&body),
            tools: count_tools(&body),
        },
        content: body,
        file: rel_path,
    }
}

// Empty values count as absent.
fn field<'a>(metadata: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn document_without_metadata_gets_defaults() {
        let tech = parse_technology(
            "# Заголовок\n\n> Кратко.\n\n## Раздел\n",
            "T-EL-005.md",
            "технологии/электрика/T-EL-005.md".to_string(),
        );
        assert_eq!(tech.id, "T-EL-005");
        assert_eq!(tech.name, "T-EL-005");
        assert_eq!(tech.status, Status::Draft);
        assert_eq!(tech.stage, Stage::Rough);
        assert_eq!(tech.difficulty, 1);
        assert_eq!(tech.process, "");
        assert_eq!(tech.time_to_learn, "");
        assert_eq!(tech.description, "Кратко.");
        assert_eq!(tech.sections, vec!["Раздел".to_string()]);
        assert_eq!(tech.file, "технологии/электрика/T-EL-005.md");
    }

    #[test]
    fn metadata_fields_populate_record() {
        let text = "---\nid: T-EL-010\nname: Прокладка кабеля\nprocess: Электромонтаж\nstage: чистовая\ndifficulty: 4\ntime_to_learn: \"2 недели\"\nstatus: approved\n---\n# Прокладка\n\n> Описание\n";
        let tech = parse_technology(text, "T-EL-010-draft.md", "x".to_string());
        assert_eq!(tech.id, "T-EL-010");
        assert_eq!(tech.name, "Прокладка кабеля");
        assert_eq!(tech.process, "Электромонтаж");
        assert_eq!(tech.stage, Stage::Finish);
        assert_eq!(tech.difficulty, 4);
        assert_eq!(tech.time_to_learn, "2 недели");
        assert_eq!(tech.status, Status::Approved);
        assert_eq!(tech.content, "# Прокладка\n\n> Описание");
    }

    #[test]
    fn empty_metadata_values_fall_back() {
        let text = "---\nid:\nname: \"\"\nstatus:\n---\nbody";
        let tech = parse_technology(text, "T-XX-001.md", "x".to_string());
        assert_eq!(tech.id, "T-XX-001");
        assert_eq!(tech.name, "T-XX-001");
        assert_eq!(tech.status, Status::Draft);
    }

    #[test]
    fn collects_only_prefixed_markdown_files_sorted_by_id() -> Result<()> {
        let temp = TempDir::new()?;
        let layout = CatalogLayout::new(temp.path());
        let topology = TopologyIndex::load_embedded()?;
        let dir = layout.technologies_dir().join("демонтаж");
        fs::create_dir_all(dir.join("T-nested"))?;
        fs::write(dir.join("T-DM-002.md"), "---\nid: T-DM-002\n---\n# B\n")?;
        fs::write(dir.join("T-DM-001.md"), "# A\n")?;
        fs::write(dir.join("README.md"), "# not a technology\n")?;
        fs::write(dir.join("T-DM-003.txt"), "wrong extension")?;
        fs::write(dir.join("T-nested").join("T-DM-000.md"), "# nested\n")?;

        let techs = collect_technologies(&layout, &topology, &DirectionId::from("D01"))?;
        let ids: Vec<&str> = techs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T-DM-001", "T-DM-002"]);
        assert_eq!(techs[0].file, "технологии/демонтаж/T-DM-001.md");
        Ok(())
    }

    #[test]
    fn id_from_metadata_drives_order() -> Result<()> {
        let temp = TempDir::new()?;
        let layout = CatalogLayout::new(temp.path());
        let topology = TopologyIndex::load_embedded()?;
        let dir = layout.technologies_dir().join("обои");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("T-a.md"), "---\nid: T-WP-009\n---\n")?;
        fs::write(dir.join("T-b.md"), "---\nid: T-WP-001\n---\n")?;

        let techs = collect_technologies(&layout, &topology, &DirectionId::from("D11"))?;
        let ids: Vec<&str> = techs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T-WP-001", "T-WP-009"]);
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() -> Result<()> {
        let temp = TempDir::new()?;
        let layout = CatalogLayout::new(temp.path());
        let topology = TopologyIndex::load_embedded()?;
        let dir = layout.technologies_dir().join("обои");
        fs::create_dir_all(&dir)?;
        // Title and quote saved in cp1251.
        let mut legacy = b"---\nid: T-WP-002\nstatus: review\n---\n# ".to_vec();
        legacy.extend_from_slice(&[0xd8, 0xef, 0xe0, 0xea]);
        legacy.extend_from_slice(b"\n\n> \xd8\xf2\xf3\xea\n");
        fs::write(dir.join("T-WP-002.md"), legacy)?;
        fs::write(dir.join("T-WP-001.md"), "---\nid: T-WP-001\n---\n")?;

        let techs = collect_technologies(&layout, &topology, &DirectionId::from("D11"))?;
        assert_eq!(techs.len(), 2);
        assert_eq!(techs[0].id, "T-WP-001");
        assert_eq!(techs[1].id, "T-WP-002");
        assert_eq!(techs[1].status, Status::Review);
        assert!(techs[1].description.contains('\u{FFFD}'));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn dangling_document_link_is_a_read_error() -> Result<()> {
        let temp = TempDir::new()?;
        let layout = CatalogLayout::new(temp.path());
        let topology = TopologyIndex::load_embedded()?;
        let dir = layout.technologies_dir().join("обои");
        fs::create_dir_all(&dir)?;
        std::os::unix::fs::symlink(dir.join("gone.md"), dir.join("T-WP-001.md"))?;

        let err = collect_technologies(&layout, &topology, &DirectionId::from("D11"))
            .expect_err("broken link must fail");
        assert!(format!("{err:#}").contains("T-WP-001.md"), "{err:#}");
        Ok(())
    }

    #[test]
    fn missing_folder_yields_no_technologies() -> Result<()> {
        let temp = TempDir::new()?;
        let layout = CatalogLayout::new(temp.path());
        let topology = TopologyIndex::load_embedded()?;
        let techs = collect_technologies(&layout, &topology, &DirectionId::from("D05"))?;
        assert!(techs.is_empty());
        Ok(())
    }
}
