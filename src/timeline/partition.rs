// Time partitioner: per-document years -> contiguous time slices.
//
// The topic model consumes documents ordered by time together with a list of
// per-slice document counts. This module produces those counts from the raw
// year of every document, for a configurable window width in years.
//
// Width 1 yields one slice per year that actually occurs. Wider windows walk
// from the first year in fixed steps, counting absent years as zero, unless
// the whole span is narrower than one window, in which case everything lands
// in a single slice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AggregateError, Result};

/// One contiguous span of years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlice {
    /// 1-based position in the partition
    pub index: usize,
    /// First year covered (inclusive)
    pub start_year: i32,
    /// Last year covered (inclusive), clipped to the last observed year
    pub end_year: i32,
    /// Number of documents whose year falls in the span
    pub count: usize,
}

/// The ordered slices for one timestamp sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlicePartition {
    /// Distinct years present in the input, ascending
    pub unique_years: Vec<i32>,
    pub slices: Vec<TimeSlice>,
}

impl SlicePartition {
    /// Document count per slice, in slice order.
    pub fn counts(&self) -> Vec<usize> {
        self.slices.iter().map(|s| s.count).collect()
    }

    /// The first year of each slice, used to label table rows and chart axes.
    pub fn labels(&self) -> Vec<i32> {
        self.slices.iter().map(|s| s.start_year).collect()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total_documents(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

/// Partition per-document years into slices of `window_width` years.
///
/// The input does not need to be sorted; counts are computed per year. The
/// returned counts always sum to `years.len()`.
pub fn partition(years: &[i32], window_width: usize) -> Result<SlicePartition> {
    if years.is_empty() {
        return Err(AggregateError::invalid_parameter(
            "cannot partition an empty year sequence",
        ));
    }
    if window_width == 0 {
        return Err(AggregateError::invalid_parameter(
            "time window width must be at least 1",
        ));
    }

    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for &year in years {
        *per_year.entry(year).or_insert(0) += 1;
    }
    let unique_years: Vec<i32> = per_year.keys().copied().collect();

    let slices = if window_width == 1 {
        per_year
            .iter()
            .enumerate()
            .map(|(i, (&year, &count))| TimeSlice {
                index: i + 1,
                start_year: year,
                end_year: year,
                count,
            })
            .collect()
    } else {
        windowed_slices(&per_year, window_width)
    };

    let partition = SlicePartition {
        unique_years,
        slices,
    };
    debug_assert_eq!(partition.total_documents(), years.len());

    debug!(
        documents = years.len(),
        window_width,
        slices = partition.len(),
        "Partitioned document years"
    );

    Ok(partition)
}

/// Fixed-width walk for `window_width >= 2`. `per_year` must be non-empty.
fn windowed_slices(per_year: &BTreeMap<i32, usize>, window_width: usize) -> Vec<TimeSlice> {
    // Year spans are computed in i64 so a window near i32::MAX cannot overflow.
    let start = i64::from(*per_year.keys().next().unwrap_or(&0));
    let end = i64::from(*per_year.keys().next_back().unwrap_or(&0));
    let width = i64::try_from(window_width).unwrap_or(i64::MAX);

    if end - start < width {
        return vec![TimeSlice {
            index: 1,
            start_year: start as i32,
            end_year: end as i32,
            count: per_year.values().sum(),
        }];
    }

    let mut slices = Vec::new();
    let mut current = start;
    while current <= end {
        let last = (current + width - 1).min(end);
        let count = per_year
            .range(current as i32..=last as i32)
            .map(|(_, &c)| c)
            .sum();
        slices.push(TimeSlice {
            index: slices.len() + 1,
            start_year: current as i32,
            end_year: last as i32,
            count,
        });
        current += width;
    }
    slices
}
