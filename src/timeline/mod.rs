// Time partitioning: grouping per-document years into time slices.

pub mod partition;
