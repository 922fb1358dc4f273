mod extract;
mod file_ops;
mod flat_split;
mod organize;

pub use extract::extract_class;
pub use file_ops::{copy_file_if_absent, move_file, remove_files, FileOpError, FileOpResult};
pub use flat_split::{split_flat_directory, FlatSplitRatios, FlatSplitSummary};
pub use organize::{organize_labels, OrganizeSummary};
