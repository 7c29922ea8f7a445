// Colored terminal summaries of a topic's top terms and documents.
//
// Each `render_*` function builds the text; the matching `display_*`
// function prints it.

use std::fmt::Write as _;

use colored::Colorize;

use crate::topics::documents::RankedDocument;
use crate::topics::selection::Selection;
use crate::topics::word_time::WordTimeSeries;

const BAR_WIDTH: usize = 20;

/// Ranked terms of one topic with their share of the selected mass.
pub fn render_term_ranking(topic_label: &str, series: &WordTimeSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        format!("=== {topic_label}: top {} terms ===", series.terms.len()).bold()
    );

    let total: f64 = series.terms.iter().map(|t| t.mass).sum();
    for (i, term) in series.terms.iter().enumerate() {
        let share = if total > 0.0 { term.mass / total } else { 0.0 };
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {} {:.4}",
            i + 1,
            term.term.bold(),
            weight_bar(share),
            term.mass
        );
    }
    out
}

/// Ranked documents of one topic with their normalized weights.
pub fn render_document_ranking(topic_label: &str, docs: &Selection<RankedDocument>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        format!("=== {topic_label}: top {} documents ===", docs.len()).bold()
    );

    // Bars are scaled to the top document so small weights stay visible.
    let top = docs.items.first().map(|d| d.weight).unwrap_or(0.0);
    for (i, doc) in docs.iter().enumerate() {
        let relative = if top > 0.0 { doc.weight / top } else { 0.0 };
        let _ = writeln!(
            out,
            "  {:>2}. {:<32} {} {:.4}",
            i + 1,
            doc.label,
            weight_bar(relative),
            doc.weight
        );
    }
    if let Some(shortfall) = docs.shortfall() {
        let _ = writeln!(out, "  {}", shortfall.to_string().dimmed());
    }
    out
}

pub fn display_term_ranking(topic_label: &str, series: &WordTimeSeries) {
    print!("{}", render_term_ranking(topic_label, series));
}

pub fn display_document_ranking(topic_label: &str, docs: &Selection<RankedDocument>) {
    print!("{}", render_document_ranking(topic_label, docs));
}

/// A fixed-width bar for a fraction in [0, 1], colored by magnitude.
fn weight_bar(fraction: f64) -> colored::ColoredString {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    if fraction >= 0.5 {
        bar.bright_green()
    } else if fraction >= 0.2 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}
