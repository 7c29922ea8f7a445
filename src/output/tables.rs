// CSV tables for downstream plotting.
//
// Three tables come out of a run:
//   topic_times.csv          slices x topics, plus mean/std columns
//   word-times_topic<N>.csv  selected terms x slices, plus mean/std rows
//   topic_docs.csv           rank x topic, "<label> <weight>" cells
//
// Slices are labelled by their first year throughout.

use std::io::Write;

use anyhow::{Context, Result};

use crate::topics::documents::RankedDocument;
use crate::topics::selection::Selection;
use crate::topics::topic_time::TopicTimeMatrix;
use crate::topics::word_time::WordTimeSeries;

/// Write the topic-time table: `year,<topics...>,mean,std`.
pub fn write_topic_times<W: Write>(
    writer: W,
    table: &TopicTimeMatrix,
    slice_labels: &[i32],
    topic_labels: &[String],
) -> Result<()> {
    if slice_labels.len() != table.num_slices() {
        anyhow::bail!(
            "Topic-time table has {} slices but {} slice labels were given",
            table.num_slices(),
            slice_labels.len()
        );
    }
    if topic_labels.len() != table.num_topics() {
        anyhow::bail!(
            "Topic-time table has {} topics but {} topic labels were given",
            table.num_topics(),
            topic_labels.len()
        );
    }

    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["year".to_string()];
    header.extend(topic_labels.iter().cloned());
    header.push("mean".to_string());
    header.push("std".to_string());
    out.write_record(&header)?;

    for (i, row) in table.weights.rows().into_iter().enumerate() {
        let mut record = vec![slice_labels[i].to_string()];
        record.extend(row.iter().map(|w| w.to_string()));
        record.push(table.mean[i].to_string());
        record.push(table.std[i].to_string());
        out.write_record(&record)?;
    }

    out.flush().context("Failed to flush topic-time table")?;
    Ok(())
}

/// Write one topic's word-time table: `Year,<slice years...>`, one row per
/// selected term, then a `mean` row and a `std` row.
pub fn write_word_times<W: Write>(
    writer: W,
    series: &WordTimeSeries,
    slice_labels: &[i32],
) -> Result<()> {
    if slice_labels.len() != series.mean.len() {
        anyhow::bail!(
            "Word-time series covers {} slices but {} slice labels were given",
            series.mean.len(),
            slice_labels.len()
        );
    }

    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["Year".to_string()];
    header.extend(slice_labels.iter().map(|y| y.to_string()));
    out.write_record(&header)?;

    for term in series.terms.iter() {
        let mut record = vec![term.term.clone()];
        record.extend(term.series.iter().map(|p| p.to_string()));
        out.write_record(&record)?;
    }
    for (name, values) in [("mean", &series.mean), ("std", &series.std)] {
        let mut record = vec![name.to_string()];
        record.extend(values.iter().map(|v| v.to_string()));
        out.write_record(&record)?;
    }

    out.flush().context("Failed to flush word-time table")?;
    Ok(())
}

/// Write the topic-docs table: one column per topic, row `r` holding each
/// topic's r-th document as `"<label> <weight>"`.
///
/// Topics with fewer ranked documents get empty cells in the lower rows.
pub fn write_topic_docs<W: Write>(
    writer: W,
    rankings: &[(usize, &Selection<RankedDocument>)],
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let header: Vec<String> = rankings.iter().map(|(t, _)| t.to_string()).collect();
    out.write_record(&header)?;

    let depth = rankings.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    for rank in 0..depth {
        let record: Vec<String> = rankings
            .iter()
            .map(|(_, selection)| {
                selection
                    .items
                    .get(rank)
                    .map(|d| format!("{} {}", d.label, d.weight))
                    .unwrap_or_default()
            })
            .collect();
        out.write_record(&record)?;
    }

    out.flush().context("Failed to flush topic-docs table")?;
    Ok(())
}
