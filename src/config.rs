use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::io::topic_log_prob_path;

/// Post-processing settings for one fitted model.
///
/// Read from a flat `key=value` settings file:
///
/// ```text
/// topics=10
/// time=2
/// words=8
/// docs=10
/// topic0=Economy
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Number of topics the model was fitted with (`topics=`)
    pub num_topics: usize,
    /// Time window width in years (`time=`, default 1)
    pub time_window: usize,
    /// Terms to keep per topic in word-time series (`words=`, default 8)
    pub top_words: usize,
    /// Documents to keep per topic in rankings (`docs=`, default 10)
    pub top_docs: usize,
    /// Optional display labels (`topic<N>=label`)
    pub topic_labels: BTreeMap<usize, String>,
}

impl Settings {
    pub const DEFAULT_TIME_WINDOW: usize = 1;
    pub const DEFAULT_TOP_WORDS: usize = 8;
    pub const DEFAULT_TOP_DOCS: usize = 10;

    /// Settings with the given topic count and defaults for everything else.
    pub fn new(num_topics: usize) -> Self {
        Self {
            num_topics,
            time_window: Self::DEFAULT_TIME_WINDOW,
            top_words: Self::DEFAULT_TOP_WORDS,
            top_docs: Self::DEFAULT_TOP_DOCS,
            topic_labels: BTreeMap::new(),
        }
    }

    /// Parse settings file text. `topics` is required.
    pub fn parse(text: &str) -> Result<Self> {
        let mut num_topics = None;
        let mut settings = Self::new(0);

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                debug!(line = line_no + 1, "Skipping settings line without '='");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "topics" => num_topics = Some(parse_count(key, value, line_no)?),
                "time" => settings.time_window = parse_count(key, value, line_no)?,
                "words" => settings.top_words = parse_count(key, value, line_no)?,
                "docs" => settings.top_docs = parse_count(key, value, line_no)?,
                _ => match key.strip_prefix("topic").and_then(|n| n.parse::<usize>().ok()) {
                    Some(topic) => {
                        settings.topic_labels.insert(topic, value.to_string());
                    }
                    None => debug!(key, "Ignoring unknown settings key"),
                },
            }
        }

        settings.num_topics = num_topics
            .ok_or_else(|| anyhow::anyhow!("Settings are missing the required `topics=` line"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, then apply environment overrides.
    ///
    /// A `.env` file in the working directory is loaded first, so overrides
    /// can live there.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let _ = dotenvy::dotenv();

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let mut settings = Self::parse(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Override counts from `DTM_TOPICS`, `DTM_TIME_WINDOW`, `DTM_TOP_WORDS`
    /// and `DTM_TOP_DOCS` as returned by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let fields: [(&str, &mut usize); 4] = [
            ("DTM_TOPICS", &mut self.num_topics),
            ("DTM_TIME_WINDOW", &mut self.time_window),
            ("DTM_TOP_WORDS", &mut self.top_words),
            ("DTM_TOP_DOCS", &mut self.top_docs),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var) {
                *field = value
                    .trim()
                    .parse()
                    .with_context(|| format!("{var} must be a positive integer, got {value:?}"))?;
                debug!(var, value = *field, "Applied settings override");
            }
        }
        self.validate()
    }

    /// Every count must be at least 1.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("topics", self.num_topics),
            ("time", self.time_window),
            ("words", self.top_words),
            ("docs", self.top_docs),
        ] {
            if value == 0 {
                anyhow::bail!("Setting `{name}` must be at least 1");
            }
        }
        Ok(())
    }

    /// Display label for a topic, falling back to `topic_<N>`.
    pub fn topic_label(&self, topic: usize) -> String {
        self.topic_labels
            .get(&topic)
            .cloned()
            .unwrap_or_else(|| format!("topic_{topic}"))
    }

    /// Labels for every topic, in topic order.
    pub fn topic_label_list(&self) -> Vec<String> {
        (0..self.num_topics).map(|t| self.topic_label(t)).collect()
    }
}

fn parse_count(key: &str, value: &str, line_no: usize) -> Result<usize> {
    value.parse().with_context(|| {
        format!(
            "Settings line {}: `{key}` must be a positive integer, got {value:?}",
            line_no + 1
        )
    })
}

/// Where a fitted model's files live on disk.
///
/// The model directory holds the fitting output (`lda-seq/gam.dat` and the
/// per-topic `lda-seq/topic-NNN-var-e-log-prob.dat` files). The corpus
/// prefix names the model input files (`<prefix>.vocab`, `<prefix>.dmap`,
/// `<prefix>-seq.dat`).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLayout {
    pub model_dir: PathBuf,
    pub corpus_prefix: PathBuf,
}

impl ModelLayout {
    pub const DEFAULT_MODEL_DIR: &'static str = "./models/dtm";
    pub const DEFAULT_CORPUS_PREFIX: &'static str = "./models/db/cleaned_data";

    pub fn new(model_dir: impl Into<PathBuf>, corpus_prefix: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            corpus_prefix: corpus_prefix.into(),
        }
    }

    /// Layout from `DTM_MODEL_DIR` and `DTM_CORPUS_PREFIX`, with defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::new(
            env::var("DTM_MODEL_DIR").unwrap_or_else(|_| Self::DEFAULT_MODEL_DIR.to_string()),
            env::var("DTM_CORPUS_PREFIX")
                .unwrap_or_else(|_| Self::DEFAULT_CORPUS_PREFIX.to_string()),
        )
    }

    fn seq_dir(&self) -> PathBuf {
        self.model_dir.join("lda-seq")
    }

    /// Document-topic weights (gamma).
    pub fn gamma_path(&self) -> PathBuf {
        self.seq_dir().join("gam.dat")
    }

    /// Term log-probabilities for one topic.
    pub fn topic_log_prob_path(&self, topic: usize) -> PathBuf {
        topic_log_prob_path(self.seq_dir(), topic)
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.with_suffix(".vocab")
    }

    pub fn doc_map_path(&self) -> PathBuf {
        self.with_suffix(".dmap")
    }

    /// Per-slice document counts handed to the model.
    pub fn slice_path(&self) -> PathBuf {
        self.with_suffix("-seq.dat")
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = self.corpus_prefix.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }
}
