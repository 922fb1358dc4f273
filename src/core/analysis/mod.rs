mod balancer;
mod distribution;
mod integrity;

pub use balancer::{
    assign_records, balance, collect_class_buckets, Record, SplitRatios, SubsetAssignment,
    RATIO_SUM_TOLERANCE,
};
pub use distribution::{analyze_distribution, DistributionReport};
pub use integrity::{scan_orphans, OrphanScan};
