// dtm-slices: time-slice aggregation of dynamic topic model output
//
// This is the library root. The aggregation core (timeline, topics, matrix)
// is pure and works on in-memory data only. The outer modules (config, io,
// output, pipeline) load model files, write tables, and run the whole batch.

pub mod config;
pub mod error;
pub mod io;
pub mod matrix;
pub mod output;
pub mod pipeline;
pub mod timeline;
pub mod topics;

pub use error::{AggregateError, Result};
pub use timeline::partition::{partition, SlicePartition, TimeSlice};
pub use topics::documents::{rank_documents, RankedDocument};
pub use topics::selection::Selection;
pub use topics::topic_time::{aggregate_topic_time, TopicTimeMatrix};
pub use topics::word_time::{aggregate_word_time, TermSeries, WordTimeSeries};
