// Document ranking per topic.
//
// Each topic column of the document-topic matrix is divided by its total, so
// a document's weight is its share of the topic across the whole corpus. The
// top documents by that share are reported with their labels.

use std::collections::BTreeMap;

use ndarray::{Array2, Axis};
use serde::Serialize;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::matrix::{ensure_finite, reshape};

use super::selection::{top_k, Selection};

/// A document's normalized weight within one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub label: String,
    /// Row in the document-topic matrix
    pub index: usize,
    pub weight: f64,
}

/// Rank the top `top_k` documents of every topic.
///
/// Fails as a whole if any topic column sums to zero; use
/// [`rank_topic_documents`] to rank topics independently.
pub fn rank_documents(
    weights: &[f64],
    num_topics: usize,
    doc_labels: &[String],
    top_k_docs: usize,
) -> Result<BTreeMap<usize, Selection<RankedDocument>>> {
    let gammas = document_topic_matrix(weights, num_topics, doc_labels, top_k_docs)?;

    let totals = gammas.sum_axis(Axis(0));
    if let Some(topic) = totals.iter().position(|&t| t == 0.0) {
        return Err(AggregateError::DegenerateTopic { topic });
    }

    let ranked = (0..num_topics)
        .map(|topic| {
            let selection = rank_column(&gammas, topic, totals[topic], doc_labels, top_k_docs);
            (topic, selection)
        })
        .collect();

    debug!(
        documents = doc_labels.len(),
        topics = num_topics,
        top_k = top_k_docs,
        "Ranked documents for all topics"
    );

    Ok(ranked)
}

/// Rank the top documents of a single topic.
pub fn rank_topic_documents(
    weights: &[f64],
    num_topics: usize,
    doc_labels: &[String],
    topic: usize,
    top_k_docs: usize,
) -> Result<Selection<RankedDocument>> {
    let gammas = document_topic_matrix(weights, num_topics, doc_labels, top_k_docs)?;
    if topic >= num_topics {
        return Err(AggregateError::invalid_parameter(format!(
            "topic {topic} out of range for {num_topics} topics"
        )));
    }

    let total = gammas.column(topic).sum();
    if total == 0.0 {
        return Err(AggregateError::DegenerateTopic { topic });
    }
    Ok(rank_column(&gammas, topic, total, doc_labels, top_k_docs))
}

fn document_topic_matrix(
    weights: &[f64],
    num_topics: usize,
    doc_labels: &[String],
    top_k_docs: usize,
) -> Result<Array2<f64>> {
    if num_topics == 0 {
        return Err(AggregateError::invalid_parameter(
            "number of topics must be at least 1",
        ));
    }
    if top_k_docs == 0 {
        return Err(AggregateError::invalid_parameter(
            "number of top documents must be at least 1",
        ));
    }
    if weights.len() % num_topics != 0 {
        return Err(AggregateError::malformed(
            format!("document-topic weights (a multiple of {num_topics} topics)"),
            doc_labels.len() * num_topics,
            weights.len(),
        ));
    }
    let num_documents = weights.len() / num_topics;
    if num_documents != doc_labels.len() {
        return Err(AggregateError::malformed(
            "document labels",
            num_documents,
            doc_labels.len(),
        ));
    }

    let gammas = reshape(weights, num_documents, num_topics, "document-topic weights")?;
    ensure_finite(&gammas)?;
    Ok(gammas)
}

fn rank_column(
    gammas: &Array2<f64>,
    topic: usize,
    total: f64,
    doc_labels: &[String],
    top_k_docs: usize,
) -> Selection<RankedDocument> {
    let normalized: Vec<f64> = gammas.column(topic).iter().map(|w| w / total).collect();
    let items = top_k(&normalized, top_k_docs)
        .into_iter()
        .map(|(index, weight)| RankedDocument {
            label: doc_labels[index].clone(),
            index,
            weight,
        })
        .collect();
    Selection {
        items,
        requested: top_k_docs,
    }
}
