//! Export formatting for idea lists
//!
//! All formatters are pure and total: any list, including an empty one,
//! produces a document.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, info};

use super::list::IdeaList;

/// Column header used when a CSV header row is requested
pub const CSV_HEADER: &str = "idea";

/// Downloadable document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {}. Use: txt or csv", s)),
        }
    }
}

/// Newline-joined ideas, no trailing newline
pub fn to_text(list: &IdeaList) -> String {
    list.iter().map(|idea| idea.as_str()).collect::<Vec<_>>().join("\n")
}

/// "1. idea" lines, for copying the list as displayed
pub fn to_numbered_text(list: &IdeaList) -> String {
    list.iter()
        .enumerate()
        .map(|(i, idea)| format!("{}. {}", i + 1, idea))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-column CSV, one idea per row, quoted only where needed
pub fn to_csv(list: &IdeaList, header: bool) -> String {
    debug!(idea_count = list.len(), %header, "to_csv: called");
    // In-memory buffer, one field per record, UTF-8 input
    write_csv(list, header).expect("CSV into an in-memory buffer cannot fail")
}

fn write_csv(list: &IdeaList, header: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    if header {
        writer.write_record([CSV_HEADER])?;
    }
    for idea in list {
        writer.write_record([idea.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| eyre::eyre!("Failed to flush CSV buffer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render a list in the given format
pub fn render(list: &IdeaList, format: ExportFormat, csv_header: bool) -> String {
    match format {
        ExportFormat::Text => to_text(list),
        ExportFormat::Csv => to_csv(list, csv_header),
    }
}

/// Lowercase ASCII slug of the topic, words joined by '-'
fn topic_slug(topic: &str) -> String {
    let slug = topic
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "ideas".to_string()
    } else {
        slug.chars().take(60).collect::<String>().trim_end_matches('-').to_string()
    }
}

/// File name describing the topic, e.g. "content-ideas-vegan-breakfast.csv"
pub fn export_file_name(topic: &str, format: ExportFormat) -> String {
    format!("content-ideas-{}.{}", topic_slug(topic), format.extension())
}

/// Write the list to `dir` and return the path written
pub fn write_export(
    list: &IdeaList,
    format: ExportFormat,
    dir: &Path,
    topic: &str,
    csv_header: bool,
) -> Result<PathBuf> {
    debug!(dir = %dir.display(), ?format, idea_count = list.len(), "write_export: called");
    fs::create_dir_all(dir).context(format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(topic, format));
    let mut content = render(list, format, csv_header);
    if format == ExportFormat::Text && !content.is_empty() {
        content.push('\n');
    }

    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;
    info!("Exported {} ideas to {}", list.len(), path.display());
    Ok(path)
}
