// Model-output readers and writers.
//
// The topic model reads and writes plain text: one number per line for
// matrices and slice counts, one entry per line for vocabulary and document
// maps. Everything here returns fully loaded vectors for the pure core.

pub mod model_files;
pub mod reader;

pub use model_files::{read_slice_file, topic_log_prob_path, write_slice_file, write_unique_years};
pub use reader::{read_doc_labels, read_lines, read_numeric, years_from_dir};
