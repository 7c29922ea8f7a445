// Batch pipeline: model files -> aggregated tables.
//
// `batch` runs every aggregation over in-memory outputs and keeps going when
// a single topic fails. `files` handles loading the model's files and writing
// the resulting tables.

pub mod batch;
pub mod files;

pub use batch::{run, ModelOutputs, Outcome, Report, TopicReport};
pub use files::{load_outputs, prepare_slices, write_report};
