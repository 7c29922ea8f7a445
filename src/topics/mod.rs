// Topic aggregation: topic-time distributions, word-time series per topic,
// and document rankings per topic. All pure functions over in-memory data.

pub mod documents;
pub mod selection;
pub mod topic_time;
pub mod word_time;
