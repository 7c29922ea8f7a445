// Composition tests: verifying that the stages chain together correctly.
//
// These tests exercise the data flow between modules:
//   corpus years -> partition -> topic-time / word-time / document ranking
//   -> report -> tables
// First purely in memory, then through a model directory written to the
// system temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use dtm_slices::config::{ModelLayout, Settings};
use dtm_slices::io::{read_slice_file, topic_log_prob_path};
use dtm_slices::output::to_json;
use dtm_slices::pipeline::{load_outputs, prepare_slices, run, write_report, ModelOutputs};
use dtm_slices::{aggregate_topic_time, partition};

// ============================================================
// Chain: partition -> topic-time
// ============================================================

#[test]
fn partition_counts_segment_the_gamma_matrix() {
    let years = [2000, 2000, 2001, 2003];
    let p = partition(&years, 2).unwrap();
    // docs 0..3 land in slice 1, doc 3 in slice 2
    let gammas = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.25, 0.75];
    let tt = aggregate_topic_time(&gammas, 2, &p.counts()).unwrap();
    assert_eq!(tt.num_slices(), 2);
    assert!((tt.weights[[0, 0]] - 0.5).abs() < 1e-9);
    assert!((tt.weights[[1, 1]] - 0.75).abs() < 1e-9);
}

#[test]
fn in_memory_run_reports_every_topic() {
    let settings = Settings::parse("topics=2\ntime=1\nwords=1\ndocs=2\ntopic1=Sport\n").unwrap();
    let outputs = ModelOutputs {
        years: vec![1990, 1991, 1991],
        gammas: vec![0.6, 0.4, 0.1, 0.9, 0.5, 0.5],
        topic_log_probs: vec![vec![-0.1, -0.2, -2.0, -2.0], vec![-3.0, -3.0, -0.3, -0.3]],
        vocabulary: vec!["market".to_string(), "match".to_string()],
        doc_labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    };

    let report = run(&settings, &outputs).unwrap();
    assert_eq!(report.failure_count(), 0);
    assert_eq!(report.topics[1].label, "Sport");
    assert_eq!(
        report.topics[0].words.result().unwrap().term_names(),
        vec!["market"]
    );
    assert_eq!(
        report.topics[1].words.result().unwrap().term_names(),
        vec!["match"]
    );

    let docs = report.topics[1].documents.result().unwrap();
    assert_eq!(docs.items[0].label, "b");

    let json = to_json(&report).unwrap();
    assert!(json.contains("\"status\": \"completed\""), "{json}");
}

#[test]
fn degenerate_slice_is_reported_not_hidden() {
    let settings = Settings::new(2);
    let outputs = ModelOutputs {
        years: vec![2000, 2001],
        gammas: vec![0.5, 0.5, 0.0, 0.0],
        topic_log_probs: vec![vec![-1.0, -1.0], vec![-1.0, -1.0]],
        vocabulary: vec!["only".to_string()],
        doc_labels: vec!["x".to_string(), "y".to_string()],
    };
    let report = run(&settings, &outputs).unwrap();
    assert!(report.topic_time.is_failed());
    // The rest of the run still completes
    assert!(report.topics.iter().all(|t| t.words.result().is_some()));

    let json = to_json(&report).unwrap();
    assert!(json.contains("Degenerate slice 2"), "{json}");
}

// ============================================================
// Chain: model files -> report -> tables
// ============================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dtm_slices_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_lines<T: ToString>(path: &Path, values: &[T]) {
    let text: String = values.iter().map(|v| format!("{}\n", v.to_string())).collect();
    fs::write(path, text).unwrap();
}

/// A 2-topic model over 4 documents (years 2000, 2000, 2001, 2003) and a
/// 3-term vocabulary, with a 2-year window (2 slices).
fn build_model(root: &Path) -> (ModelLayout, PathBuf) {
    let corpus = root.join("corpus");
    fs::create_dir_all(corpus.join("nested")).unwrap();
    fs::write(corpus.join("2000.txt"), "a").unwrap();
    fs::write(corpus.join("nested").join("2000.1.txt"), "b").unwrap();
    fs::write(corpus.join("2001.txt"), "c").unwrap();
    fs::write(corpus.join("2003.txt"), "d").unwrap();
    fs::write(corpus.join("notes.md"), "ignored").unwrap();

    let layout = ModelLayout::new(root.join("dtm"), root.join("db").join("cleaned_data"));
    let seq_dir = root.join("dtm").join("lda-seq");
    fs::create_dir_all(&seq_dir).unwrap();
    fs::create_dir_all(root.join("db")).unwrap();

    write_lines(
        &layout.gamma_path(),
        &[0.2, 0.8, 0.5, 0.5, 0.9, 0.1, 0.25, 0.75],
    );
    write_lines(&topic_log_prob_path(&seq_dir, 0), &[-0.2, -0.3, -1.5, -1.2, -3.0, -3.0]);
    write_lines(&topic_log_prob_path(&seq_dir, 1), &[-3.0, -2.5, -0.4, -0.6, -0.9, -0.1]);
    write_lines(&layout.vocab_path(), &["economy 12", "election 7", "football 3"]);
    write_lines(
        &layout.doc_map_path(),
        &["corpus\\2000.txt", "corpus\\2000.1.txt", "corpus\\2001.txt", "corpus\\2003.txt"],
    );

    (layout, corpus)
}

#[test]
fn prepare_slices_writes_model_slice_file() {
    let root = scratch_dir("prepare");
    let (layout, corpus) = build_model(&root);

    let p = prepare_slices(&layout, &corpus, 2).unwrap();
    assert_eq!(p.counts(), vec![3, 1]);
    assert_eq!(read_slice_file(layout.slice_path()).unwrap(), vec![3, 1]);

    let years = fs::read_to_string(root.join("db").join("time-seq.txt")).unwrap();
    assert_eq!(years, "2000\n2001\n2003\n");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn full_run_from_model_directory() {
    let root = scratch_dir("full_run");
    let (layout, corpus) = build_model(&root);

    let mut settings = Settings::new(2);
    settings.time_window = 2;
    settings.top_words = 2;
    settings.top_docs = 3;

    let outputs = load_outputs(&layout, &corpus, settings.num_topics).unwrap();
    assert_eq!(outputs.years, vec![2000, 2000, 2001, 2003]);
    assert_eq!(outputs.vocabulary, vec!["economy", "election", "football"]);
    assert_eq!(outputs.doc_labels[1], "2000.1.txt");

    let report = run(&settings, &outputs).unwrap();
    assert_eq!(report.failure_count(), 0);
    assert_eq!(report.partition.labels(), vec![2000, 2002]);

    let out_dir = root.join("out");
    let written = write_report(&report, &out_dir).unwrap();
    // years, slices, topic_times, topic_docs, one word-times per topic
    assert_eq!(written.len(), 6);

    let topic_times = fs::read_to_string(out_dir.join("topic_times.csv")).unwrap();
    let lines: Vec<&str> = topic_times.lines().collect();
    assert_eq!(lines[0], "year,topic_0,topic_1,mean,std");
    assert!(lines[1].starts_with("2000,"));
    assert!(lines[2].starts_with("2002,0.25,0.75,0.5,"));

    let words = fs::read_to_string(out_dir.join("word-times_topic0.csv")).unwrap();
    let lines: Vec<&str> = words.lines().collect();
    assert_eq!(lines[0], "Year,2000,2002");
    assert!(lines[1].starts_with("economy,"));
    assert!(lines[2].starts_with("election,"));
    assert!(lines[3].starts_with("mean,"));
    assert!(lines[4].starts_with("std,"));

    let docs = fs::read_to_string(out_dir.join("topic_docs.csv")).unwrap();
    let lines: Vec<&str> = docs.lines().collect();
    assert_eq!(lines[0], "0,1");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("2001.txt "));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_topic_file_fails_loading() {
    let root = scratch_dir("missing_topic");
    let (layout, corpus) = build_model(&root);

    let err = load_outputs(&layout, &corpus, 3).unwrap_err();
    assert!(
        format!("{err:#}").contains("topic-002-var-e-log-prob.dat"),
        "{err:#}"
    );

    let _ = fs::remove_dir_all(&root);
}
