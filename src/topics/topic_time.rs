// Topic-time aggregation.
//
// The model's gamma output is one row of topic weights per document, with
// documents in time order. Walking the slice counts in order consumes that
// many consecutive rows per slice; the rows are summed per topic and each
// slice's row is normalized to a distribution over topics.

use ndarray::{s, Array2, Axis};
use serde::Serialize;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::matrix::{ensure_finite, reshape, row_stats, serialize_rows};

/// Normalized slice x topic weights, with per-slice summary series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicTimeMatrix {
    /// Rows are slices in partition order, columns are topics; rows sum to 1
    #[serde(serialize_with = "serialize_rows")]
    pub weights: Array2<f64>,
    /// Mean of each slice's topic weights
    pub mean: Vec<f64>,
    /// Population standard deviation of each slice's topic weights
    pub std: Vec<f64>,
}

impl TopicTimeMatrix {
    pub fn num_slices(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_topics(&self) -> usize {
        self.weights.ncols()
    }

    /// One topic's relative weight across all slices.
    pub fn topic_series(&self, topic: usize) -> Option<Vec<f64>> {
        (topic < self.num_topics()).then(|| self.weights.column(topic).to_vec())
    }
}

/// Aggregate flat document-topic weights into a normalized topic-time matrix.
///
/// `weights` holds `sum(slice_counts) * num_topics` values in row-major
/// order. Fails with `DegenerateSlice` if any slice's summed weight is zero,
/// which includes a slice that contains no documents.
pub fn aggregate_topic_time(
    weights: &[f64],
    num_topics: usize,
    slice_counts: &[usize],
) -> Result<TopicTimeMatrix> {
    if num_topics == 0 {
        return Err(AggregateError::invalid_parameter(
            "number of topics must be at least 1",
        ));
    }
    if slice_counts.is_empty() {
        return Err(AggregateError::invalid_parameter(
            "slice counts must not be empty",
        ));
    }

    let num_documents = slice_counts
        .iter()
        .try_fold(0usize, |acc, &count| acc.checked_add(count))
        .ok_or_else(|| AggregateError::invalid_parameter("slice counts overflow usize"))?;
    let gammas = reshape(weights, num_documents, num_topics, "document-topic weights")?;
    ensure_finite(&gammas)?;

    let mut summed = Array2::<f64>::zeros((slice_counts.len(), num_topics));
    let mut row = 0;
    for (i, &count) in slice_counts.iter().enumerate() {
        let block = gammas.slice(s![row..row + count, ..]);
        summed.row_mut(i).assign(&block.sum_axis(Axis(0)));
        row += count;
    }

    // Check every slice before normalizing any of them so a failure never
    // leaves a half-normalized matrix behind.
    let totals = summed.sum_axis(Axis(1));
    if let Some(i) = totals.iter().position(|&t| t == 0.0) {
        return Err(AggregateError::DegenerateSlice { slice: i + 1 });
    }
    for (mut slice_row, &total) in summed.rows_mut().into_iter().zip(totals.iter()) {
        slice_row /= total;
    }

    let (mean, std) = row_stats(&summed);

    debug!(
        documents = num_documents,
        slices = slice_counts.len(),
        topics = num_topics,
        "Aggregated topic-time matrix"
    );

    Ok(TopicTimeMatrix {
        weights: summed,
        mean,
        std,
    })
}
