// Word-time aggregation for a single topic.
//
// The model writes one log-probability per (term, slice) pair, term-major.
// We reshape that to terms x slices, exponentiate, and keep the terms with
// the largest total probability mass across all slices, along with their
// full time series.

use ndarray::{Array2, Axis};
use serde::Serialize;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::matrix::{column_stats, ensure_finite, reshape};

use super::selection::{top_k, Selection};

/// A selected term and its probability in every slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermSeries {
    pub term: String,
    /// Row in the vocabulary
    pub index: usize,
    /// Probability summed across all slices (the ranking key)
    pub mass: f64,
    pub series: Vec<f64>,
}

/// The top terms of one topic over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordTimeSeries {
    pub terms: Selection<TermSeries>,
    /// Mean across the selected terms, per slice
    pub mean: Vec<f64>,
    /// Population standard deviation across the selected terms, per slice
    pub std: Vec<f64>,
}

impl WordTimeSeries {
    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.term.as_str()).collect()
    }
}

/// Select the `top_k` terms of a topic by total probability mass.
///
/// `log_probs` must hold `vocabulary.len() * num_slices` values. Asking for
/// more terms than the vocabulary has returns the whole vocabulary.
pub fn aggregate_word_time(
    log_probs: &[f64],
    num_slices: usize,
    vocabulary: &[String],
    top_k_terms: usize,
) -> Result<WordTimeSeries> {
    if num_slices == 0 {
        return Err(AggregateError::invalid_parameter(
            "number of time slices must be at least 1",
        ));
    }
    if vocabulary.is_empty() {
        return Err(AggregateError::invalid_parameter("vocabulary is empty"));
    }
    if top_k_terms == 0 {
        return Err(AggregateError::invalid_parameter(
            "number of top terms must be at least 1",
        ));
    }

    let mut probs = reshape(
        log_probs,
        vocabulary.len(),
        num_slices,
        "term log-probabilities",
    )?;
    probs.mapv_inplace(f64::exp);
    ensure_finite(&probs)?;

    let mass = probs.sum_axis(Axis(1)).to_vec();
    let picked = top_k(&mass, top_k_terms);

    let items: Vec<TermSeries> = picked
        .iter()
        .map(|&(index, total)| TermSeries {
            term: vocabulary[index].clone(),
            index,
            mass: total,
            series: probs.row(index).to_vec(),
        })
        .collect();

    let indices: Vec<usize> = picked.iter().map(|(i, _)| *i).collect();
    let selected: Array2<f64> = probs.select(Axis(0), &indices);
    let (mean, std) = column_stats(&selected);

    let terms = Selection {
        items,
        requested: top_k_terms,
    };
    if let Some(shortfall) = terms.shortfall() {
        debug!(%shortfall, "Vocabulary smaller than requested term count");
    }

    debug!(
        vocabulary = vocabulary.len(),
        slices = num_slices,
        selected = terms.len(),
        "Aggregated word-time series"
    );

    Ok(WordTimeSeries { terms, mean, std })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn logs(probs: &[f64]) -> Vec<f64> {
        probs.iter().map(|p| p.ln()).collect()
    }

    #[test]
    fn test_selects_by_total_mass() {
        // 3 terms x 2 slices
        let lp = logs(&[0.1, 0.1, 0.4, 0.3, 0.2, 0.6]);
        let result = aggregate_word_time(&lp, 2, &vocab(&["a", "b", "c"]), 2).unwrap();
        assert_eq!(result.term_names(), vec!["c", "b"]);
        let c = &result.terms.items[0];
        assert!((c.mass - 0.8).abs() < 1e-9);
        assert!((c.series[1] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_mean_std_across_selected_terms() {
        let lp = logs(&[0.1, 0.1, 0.4, 0.3, 0.2, 0.6]);
        let result = aggregate_word_time(&lp, 2, &vocab(&["a", "b", "c"]), 2).unwrap();
        // Slice 0: b=0.4, c=0.2 ; slice 1: b=0.3, c=0.6
        assert!((result.mean[0] - 0.3).abs() < 1e-9);
        assert!((result.mean[1] - 0.45).abs() < 1e-9);
        assert!((result.std[0] - 0.1).abs() < 1e-9);
        assert!((result.std[1] - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_ties_prefer_earlier_terms() {
        let lp = vec![-1.5; 6];
        let result = aggregate_word_time(&lp, 2, &vocab(&["x", "y", "z"]), 2).unwrap();
        // all three terms carry identical mass
        assert_eq!(result.term_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_top_k_beyond_vocabulary_returns_all() {
        let lp = logs(&[0.5, 0.5, 0.25, 0.75]);
        let result = aggregate_word_time(&lp, 2, &vocab(&["a", "b"]), 8).unwrap();
        assert_eq!(result.terms.len(), 2);
        assert!(result.terms.shortfall().is_some());
    }

    #[test]
    fn test_overflow_is_invalid_matrix() {
        let lp = vec![0.0, 1000.0];
        let err = aggregate_word_time(&lp, 2, &vocab(&["a"]), 1).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidMatrix { row: 0, col: 1, .. }));
    }

    #[test]
    fn test_nan_log_prob_is_invalid_matrix() {
        let lp = vec![f64::NAN, -1.0];
        let err = aggregate_word_time(&lp, 2, &vocab(&["a"]), 1).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidMatrix { .. }));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = aggregate_word_time(&[-1.0; 5], 2, &vocab(&["a", "b", "c"]), 1).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MalformedInput {
                expected: 6,
                actual: 5,
                ..
            }
        ));
    }
}
