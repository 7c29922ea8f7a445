// Full post-processing pass over one fitted model.
//
// 1. Partition document years into slices
// 2. Aggregate the topic-time matrix
// 3. For every topic: rank its documents and build its word-time series
//
// Only a bad partition aborts the run. Every other step is recorded as an
// Outcome so one degenerate slice or topic never hides the results of the
// others.

use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{AggregateError, Result};
use crate::timeline::partition::{partition, SlicePartition};
use crate::topics::documents::{rank_topic_documents, RankedDocument};
use crate::topics::selection::Selection;
use crate::topics::topic_time::{aggregate_topic_time, TopicTimeMatrix};
use crate::topics::word_time::{aggregate_word_time, WordTimeSeries};

/// Everything the model produced, already loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct ModelOutputs {
    /// Year of every document, in the model's document order
    pub years: Vec<i32>,
    /// Flat document x topic weights (gamma)
    pub gammas: Vec<f64>,
    /// Flat term x slice log-probabilities, one vector per topic
    pub topic_log_probs: Vec<Vec<f64>>,
    pub vocabulary: Vec<String>,
    pub doc_labels: Vec<String>,
}

/// Result of one independent aggregation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Completed {
        result: T,
    },
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: AggregateError,
    },
}

impl<T> Outcome<T> {
    pub fn result(&self) -> Option<&T> {
        match self {
            Outcome::Completed { result } => Some(result),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AggregateError> {
        match self {
            Outcome::Completed { .. } => None,
            Outcome::Failed { error } => Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(result) => Outcome::Completed { result },
            Err(error) => Outcome::Failed { error },
        }
    }
}

fn serialize_error<S: Serializer>(
    error: &AggregateError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Per-topic results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    pub topic: usize,
    pub label: String,
    pub words: Outcome<WordTimeSeries>,
    pub documents: Outcome<Selection<RankedDocument>>,
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub partition: SlicePartition,
    pub topic_labels: Vec<String>,
    pub topic_time: Outcome<TopicTimeMatrix>,
    pub topics: Vec<TopicReport>,
}

impl Report {
    /// Number of failed steps across the whole run.
    pub fn failure_count(&self) -> usize {
        let per_topic: usize = self
            .topics
            .iter()
            .map(|t| usize::from(t.words.is_failed()) + usize::from(t.documents.is_failed()))
            .sum();
        per_topic + usize::from(self.topic_time.is_failed())
    }
}

/// Run every aggregation for one model.
///
/// Fails only when the years cannot be partitioned; all later failures are
/// recorded in the report.
pub fn run(settings: &Settings, outputs: &ModelOutputs) -> Result<Report> {
    let partition = partition(&outputs.years, settings.time_window)?;
    let counts = partition.counts();
    info!(
        documents = outputs.years.len(),
        slices = partition.len(),
        window = settings.time_window,
        "Partitioned documents into time slices"
    );

    let topic_time: Outcome<TopicTimeMatrix> =
        aggregate_topic_time(&outputs.gammas, settings.num_topics, &counts).into();
    if let Some(error) = topic_time.error() {
        warn!(error = %error, "Topic-time aggregation failed");
    }

    let topics: Vec<TopicReport> = (0..settings.num_topics)
        .map(|topic| run_topic(settings, outputs, partition.len(), topic))
        .collect();

    let report = Report {
        partition,
        topic_labels: settings.topic_label_list(),
        topic_time,
        topics,
    };
    info!(
        topics = settings.num_topics,
        failures = report.failure_count(),
        "Post-processing complete"
    );
    Ok(report)
}

fn run_topic(
    settings: &Settings,
    outputs: &ModelOutputs,
    num_slices: usize,
    topic: usize,
) -> TopicReport {
    let label = settings.topic_label(topic);

    let words: Outcome<WordTimeSeries> = match outputs.topic_log_probs.get(topic) {
        Some(log_probs) => {
            aggregate_word_time(log_probs, num_slices, &outputs.vocabulary, settings.top_words)
                .into()
        }
        None => Outcome::Failed {
            error: AggregateError::invalid_parameter(format!(
                "no term log-probabilities loaded for topic {topic}"
            )),
        },
    };
    if let Some(error) = words.error() {
        warn!(
            topic,
            label = %label,
            error = %error,
            "Word-time aggregation failed, skipping topic"
        );
    }

    let documents: Outcome<Selection<RankedDocument>> = rank_topic_documents(
        &outputs.gammas,
        settings.num_topics,
        &outputs.doc_labels,
        topic,
        settings.top_docs,
    )
    .into();
    if let Some(error) = documents.error() {
        warn!(
            topic,
            label = %label,
            error = %error,
            "Document ranking failed, skipping topic"
        );
    }

    TopicReport {
        topic,
        label,
        words,
        documents,
    }
}
