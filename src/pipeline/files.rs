// File-level entry points around the pure batch run.
//
// Before fitting: `prepare_slices` turns a year-named corpus directory into
// the slice-count file the model consumes. After fitting: `load_outputs`
// reads every model file, and `write_report` writes the tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ModelLayout;
use crate::io::{
    read_doc_labels, read_lines, read_numeric, write_slice_file, write_unique_years,
    years_from_dir,
};
use crate::output::tables::{write_topic_docs, write_topic_times, write_word_times};
use crate::timeline::partition::{partition, SlicePartition};

use super::batch::{ModelOutputs, Report};

pub const UNIQUE_YEARS_FILE: &str = "time-seq.txt";
pub const SLICE_COUNTS_FILE: &str = "slices-seq.dat";
pub const TOPIC_TIMES_FILE: &str = "topic_times.csv";
pub const TOPIC_DOCS_FILE: &str = "topic_docs.csv";

pub fn word_times_file(topic: usize) -> String {
    format!("word-times_topic{topic}.csv")
}

/// Partition a corpus directory and write the model's slice file.
///
/// Writes the slice counts to `layout.slice_path()` and the distinct years
/// to `time-seq.txt` next to it.
pub fn prepare_slices(
    layout: &ModelLayout,
    corpus_dir: impl AsRef<Path>,
    window_width: usize,
) -> Result<SlicePartition> {
    let years = years_from_dir(corpus_dir)?;
    let partition = partition(&years, window_width)?;

    let slice_path = layout.slice_path();
    if let Some(parent) = slice_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write_slice_file(&slice_path, &partition.counts())?;
    let years_path = slice_path.with_file_name(UNIQUE_YEARS_FILE);
    write_unique_years(&years_path, &partition.unique_years)?;

    info!(
        slices = partition.len(),
        documents = years.len(),
        path = %slice_path.display(),
        "Wrote time slice file"
    );
    Ok(partition)
}

/// Load every file a run needs.
pub fn load_outputs(
    layout: &ModelLayout,
    corpus_dir: impl AsRef<Path>,
    num_topics: usize,
) -> Result<ModelOutputs> {
    let years = years_from_dir(corpus_dir)?;
    let gammas = read_numeric(layout.gamma_path())?;
    let vocabulary = read_lines(layout.vocab_path())?;
    let doc_labels = read_doc_labels(layout.doc_map_path())?;
    let topic_log_probs = (0..num_topics)
        .map(|topic| read_numeric(layout.topic_log_prob_path(topic)))
        .collect::<Result<Vec<_>>>()?;

    info!(
        documents = years.len(),
        vocabulary = vocabulary.len(),
        topics = num_topics,
        "Loaded model outputs"
    );

    Ok(ModelOutputs {
        years,
        gammas,
        topic_log_probs,
        vocabulary,
        doc_labels,
    })
}

/// Write every completed table in `report` into `out_dir`.
///
/// Failed steps are skipped; the returned paths list what was written.
pub fn write_report(report: &Report, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let mut written = Vec::new();
    let labels = report.partition.labels();

    let path = out_dir.join(UNIQUE_YEARS_FILE);
    write_unique_years(&path, &report.partition.unique_years)?;
    written.push(path);

    let path = out_dir.join(SLICE_COUNTS_FILE);
    write_slice_file(&path, &report.partition.counts())?;
    written.push(path);

    if let Some(table) = report.topic_time.result() {
        let path = out_dir.join(TOPIC_TIMES_FILE);
        write_topic_times(create(&path)?, table, &labels, &report.topic_labels)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    let rankings: Vec<_> = report
        .topics
        .iter()
        .filter_map(|t| t.documents.result().map(|docs| (t.topic, docs)))
        .collect();
    if !rankings.is_empty() {
        let path = out_dir.join(TOPIC_DOCS_FILE);
        write_topic_docs(create(&path)?, &rankings)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    for topic in &report.topics {
        if let Some(series) = topic.words.result() {
            let path = out_dir.join(word_times_file(topic.topic));
            write_word_times(create(&path)?, series, &labels)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
    }

    info!(files = written.len(), dir = %out_dir.display(), "Wrote report tables");
    Ok(written)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}
