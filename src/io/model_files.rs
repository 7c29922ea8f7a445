// Model-specific file formats: slice-count files, year lists, and the
// per-topic log-probability file naming scheme.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Path of one topic's term log-probability file inside `lda-seq/`.
pub fn topic_log_prob_path(seq_dir: impl AsRef<Path>, topic: usize) -> PathBuf {
    seq_dir
        .as_ref()
        .join(format!("topic-{topic:03}-var-e-log-prob.dat"))
}

/// Read a slice file: the number of slices, then one count per line.
pub fn read_slice_file(path: impl AsRef<Path>) -> Result<Vec<usize>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read slice file {}", path.display()))?;
    parse_slice_counts(&text).with_context(|| format!("In {}", path.display()))
}

/// Write a slice file in the format `read_slice_file` expects.
pub fn write_slice_file(path: impl AsRef<Path>, counts: &[usize]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_slice_counts(counts))
        .with_context(|| format!("Failed to write slice file {}", path.display()))
}

/// Write the distinct document years, one per line.
pub fn write_unique_years(path: impl AsRef<Path>, years: &[i32]) -> Result<()> {
    let path = path.as_ref();
    let mut text = String::new();
    for year in years {
        let _ = writeln!(text, "{year}");
    }
    fs::write(path, text).with_context(|| format!("Failed to write years file {}", path.display()))
}

pub(crate) fn format_slice_counts(counts: &[usize]) -> String {
    let mut text = format!("{}\n", counts.len());
    for count in counts {
        let _ = writeln!(text, "{count}");
    }
    text
}

pub(crate) fn parse_slice_counts(text: &str) -> Result<Vec<usize>> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let declared: usize = lines
        .next()
        .context("Slice file is empty")?
        .parse()
        .context("First line of slice file must be the slice count")?;
    let counts = lines
        .map(|l| {
            l.parse::<usize>()
                .with_context(|| format!("{l:?} is not a document count"))
        })
        .collect::<Result<Vec<_>>>()?;
    if counts.len() != declared {
        anyhow::bail!(
            "Slice file declares {declared} slices but lists {}",
            counts.len()
        );
    }
    Ok(counts)
}
