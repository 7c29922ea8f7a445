// Unit tests for the time partitioner.
//
// Exercises the partition invariants over a spread of year sequences:
// counts always sum to the number of documents, width 1 yields one slice per
// distinct year, and narrow spans collapse to a single slice.

use std::collections::BTreeSet;

use dtm_slices::{partition, AggregateError};

fn sample_sequences() -> Vec<Vec<i32>> {
    vec![
        vec![2000],
        vec![2000, 2000, 2000],
        vec![1990, 1991, 1995, 1995, 2010],
        vec![1948, 1950, 1951, 1951, 1952, 2017],
        vec![2005, 2001, 2003, 2001, 2009, 2002],
        (1950..2018).flat_map(|y| vec![y; (y % 4) as usize + 1]).collect(),
    ]
}

// ============================================================
// Invariants
// ============================================================

#[test]
fn counts_sum_to_document_count_for_every_width() {
    for years in sample_sequences() {
        for width in 1..=6 {
            let p = partition(&years, width).unwrap();
            assert_eq!(
                p.total_documents(),
                years.len(),
                "width {width} lost documents for {years:?}"
            );
        }
    }
}

#[test]
fn width_one_gives_one_slice_per_distinct_year() {
    for years in sample_sequences() {
        let p = partition(&years, 1).unwrap();
        let distinct: BTreeSet<i32> = years.iter().copied().collect();
        assert_eq!(p.len(), distinct.len());
        assert_eq!(p.unique_years, distinct.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn narrow_span_collapses_to_one_slice() {
    for width in 2..=5 {
        let years: Vec<i32> = (0..width as i32).map(|i| 2000 + i).collect();
        // span = width - 1 < width
        let p = partition(&years, width).unwrap();
        assert_eq!(p.len(), 1, "width {width}");
        assert_eq!(p.slices[0].count, years.len());
    }
}

#[test]
fn slices_are_contiguous_and_increasing() {
    for years in sample_sequences() {
        for width in 2..=4 {
            let p = partition(&years, width).unwrap();
            for pair in p.slices.windows(2) {
                assert_eq!(pair[1].start_year, pair[0].end_year + 1);
                assert_eq!(pair[1].index, pair[0].index + 1);
            }
        }
    }
}

#[test]
fn partition_is_deterministic() {
    let years = vec![2003, 2000, 2001, 2000, 2007];
    assert_eq!(partition(&years, 2).unwrap(), partition(&years, 2).unwrap());
}

// ============================================================
// Concrete scenarios
// ============================================================

#[test]
fn two_year_window_example() {
    let p = partition(&[2000, 2000, 2001, 2003], 2).unwrap();
    assert_eq!(p.counts(), vec![3, 1]);
    assert_eq!(p.labels(), vec![2000, 2002]);
    assert_eq!(p.unique_years, vec![2000, 2001, 2003]);
}

#[test]
fn single_document() {
    let p = partition(&[1999], 3).unwrap();
    assert_eq!(p.counts(), vec![1]);
}

#[test]
fn empty_input_is_rejected() {
    let err = partition(&[], 2).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidParameter { .. }));
}
