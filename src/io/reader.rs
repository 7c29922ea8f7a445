// Plain-text readers for model inputs and outputs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Read every whitespace-separated number in a file, in order.
///
/// Works for one-value-per-line matrices (`gam.dat`, log-probability files)
/// as well as space-separated rows.
pub fn read_numeric(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read numeric file {}", path.display()))?;
    let values = parse_numeric(&text).with_context(|| format!("In {}", path.display()))?;
    debug!(path = %path.display(), values = values.len(), "Read numeric file");
    Ok(values)
}

pub(crate) fn parse_numeric(text: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .with_context(|| format!("Line {}: {token:?} is not a number", line_no + 1))?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Read one entry per non-empty line, keeping the first column only.
///
/// Vocabulary files may carry extra columns after the term; they are dropped.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect())
}

/// Read document labels from a document map.
///
/// Each line is a path to the source document; the label is its final
/// component, with either `\` or `/` as separator.
pub fn read_doc_labels(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document map {}", path.display()))?;
    Ok(parse_doc_labels(&text))
}

pub(crate) fn parse_doc_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.rsplit(['\\', '/'])
                .next()
                .unwrap_or(line)
                .trim()
                .to_string()
        })
        .collect()
}

/// Collect one year per document from a corpus directory.
///
/// Documents are files named by year (`1999.txt`); the directory is walked
/// recursively. Files whose stem is not an integer are skipped. The result
/// is sorted ascending, matching the order documents are fed to the model.
pub fn years_from_dir(dir: impl AsRef<Path>) -> Result<Vec<i32>> {
    let dir = dir.as_ref();
    let mut years = Vec::new();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current)
            .with_context(|| format!("Failed to list corpus directory {}", current.display()))?;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read entry in {}", current.display()))?;
            let path = entry.path();
            // Symlinked directories are not followed, so link cycles cannot loop
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Skipping symlinked directory");
                continue;
            }
            match year_of(&path) {
                Some(year) => years.push(year),
                None => warn!(path = %path.display(), "Skipping corpus file without a year name"),
            }
        }
    }

    if years.is_empty() {
        anyhow::bail!("No year-named documents found in {}", dir.display());
    }
    years.sort_unstable();
    debug!(documents = years.len(), "Collected document years");
    Ok(years)
}

fn year_of(path: &Path) -> Option<i32> {
    let name = path.file_name()?.to_str()?;
    name.split('.').next()?.parse().ok()
}
