//! Text scanners for technology documents.
//!
//! Each extractor looks for one authoring convention (metadata block, lead
//! quote, a named section, a marker) and returns the empty value when the
//! convention is absent. Documents in `draft` status are routinely incomplete,
//! so nothing here fails.

use crate::record::RelatedTechnology;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const METADATA_DELIMITER: &str = "---";
const RELATED_HEADING: &str = "## Связанные технологии";
const MATERIALS_HEADING: &str = "## Необходимые материалы";
const MATERIALS_LABEL: &str = "Материал";
const TOOLS_HEADING: &str = "## Необходимые инструменты";
const TOOLS_LABEL: &str = "Инструмент";
const CHECKPOINT_MARKER: &str = "- [ ]";
const DEFAULT_DIFFICULTY: i64 = 1;

static TECHNOLOGY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T-[A-Z]{2}-[0-9]+").expect("valid technology id pattern"));
static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Шаг [0-9]+").expect("valid step pattern"));

/// Parse the `---` delimited `key: value` block at the very start of `text`.
///
/// Lines without a colon (or with the colon in the first column) are ignored.
/// Values wrapped in double quotes lose the quotes. No block means an empty
/// map.
pub fn parse_metadata_block(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Some(block) = metadata_block(text) else {
        return fields;
    };

    for line in block.split('\n') {
        let Some(colon) = line.find(':') else {
            continue;
        };
        if colon == 0 {
            continue;
        }
        let key = line[..colon].trim();
        let value = unquote(line[colon + 1..].trim());
        fields.insert(key.to_string(), value.to_string());
    }
    fields
}

/// Inner text of the leading metadata block: everything between the opening
/// `---` line and the first following line that starts with `---`.
fn metadata_block(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix(METADATA_DELIMITER)?
        .strip_prefix('\n')?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Lead quote of the document.
///
/// Triggered by a `# Title` line (single `#`), an empty line, then a line
/// starting with `>`. Returns the quoted text without leading whitespace;
/// an empty quote line falls through to the next non-blank line.
pub fn extract_description(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    for (idx, line) in lines.iter().enumerate() {
        let mut chars = line.chars();
        if chars.next() != Some('#') || matches!(chars.next(), Some('#') | None) {
            continue;
        }
        if lines.get(idx + 1) != Some(&"") {
            continue;
        }
        let Some(quote) = lines.get(idx + 2).and_then(|l| l.strip_prefix('>')) else {
            continue;
        };
        let quoted = quote.trim_start();
        if !quoted.is_empty() {
            return quoted.to_string();
        }
        if let Some(next) = lines[idx + 3..]
            .iter()
            .map(|l| l.trim_start())
            .find(|l| !l.is_empty())
        {
            return next.to_string();
        }
    }
    String::new()
}

/// Document text with the leading metadata block removed, trimmed.
pub fn extract_body(text: &str) -> String {
    strip_metadata_block(text).trim().to_string()
}

fn strip_metadata_block(text: &str) -> &str {
    let Some(rest) = text
        .strip_prefix(METADATA_DELIMITER)
        .and_then(|r| r.strip_prefix('\n'))
    else {
        return text;
    };
    match rest.find("\n---\n") {
        Some(end) => &rest[end + "\n---\n".len()..],
        None => text,
    }
}

/// Cross-references from the related-technologies table.
///
/// The header row and `|---|` separator rows are skipped. A row whose first
/// cell carries no `T-XX-<n>` id is dropped; the rest of that cell is the name
/// and the second cell, if any, the reason.
pub fn extract_related(body: &str) -> Vec<RelatedTechnology> {
    let Some(section) = section(body, RELATED_HEADING, true) else {
        return Vec::new();
    };

    section
        .split('\n')
        .filter(|line| line.starts_with('|'))
        .filter(|line| !is_separator_row(line))
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<&str> = row
                .split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();
            let first = cells.first()?;
            let Some(found) = TECHNOLOGY_ID.find(first) else {
                tracing::debug!(row, "related row without technology id skipped");
                return None;
            };
            Some(RelatedTechnology {
                id: found.as_str().to_string(),
                name: first.replacen(found.as_str(), "", 1).trim().to_string(),
                reason: cells.get(1).map(|c| c.to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

fn is_separator_row(line: &str) -> bool {
    line.contains('-') && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Text from `heading` up to the next `\n## ` (or `\n---` when
/// `stop_at_rule`), or the end of the body.
fn section<'a>(body: &'a str, heading: &str, stop_at_rule: bool) -> Option<&'a str> {
    let start = body.find(heading)?;
    let rest = &body[start..];
    let after_heading = heading.len();
    let mut end = rest[after_heading..]
        .find("\n## ")
        .map(|pos| pos + after_heading)
        .unwrap_or(rest.len());
    if stop_at_rule {
        if let Some(rule) = rest[after_heading..].find("\n---") {
            end = end.min(rule + after_heading);
        }
    }
    Some(&rest[..end])
}

/// Every `## ` heading title, in order, duplicates included.
pub fn extract_section_titles(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.strip_prefix("## "))
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of `### Шаг <n>` markers.
pub fn count_steps(body: &str) -> usize {
    STEP_MARKER.find_iter(body).count()
}

/// Number of unchecked `- [ ]` checklist markers.
pub fn count_checkpoints(body: &str) -> usize {
    body.matches(CHECKPOINT_MARKER).count()
}

/// Rows of the required-materials table, header and separator excluded.
pub fn count_materials(body: &str) -> usize {
    count_table_rows(body, MATERIALS_HEADING, MATERIALS_LABEL)
}

/// Rows of the required-tools table, header and separator excluded.
pub fn count_tools(body: &str) -> usize {
    count_table_rows(body, TOOLS_HEADING, TOOLS_LABEL)
}

// The header row is recognised by its column label.
fn count_table_rows(body: &str, heading: &str, label: &str) -> usize {
    let Some(section) = section(body, heading, false) else {
        return 0;
    };
    section
        .split('\n')
        .filter(|line| line.starts_with('|') && !line.contains("---") && !line.contains(label))
        .count()
}

/// Leading integer of a difficulty value; missing, non-numeric or zero reads
/// as 1. Digit runs that do not fit in an `i64` also read as 1.
pub fn parse_difficulty(value: Option<&str>) -> i64 {
    let Some(raw) = value else {
        return DEFAULT_DIFFICULTY;
    };
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_DIFFICULTY,
        Ok(n) => sign * n,
    }
}
