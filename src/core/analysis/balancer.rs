//! Class-stratified dataset balancing.
//!
//! Re-splits a train/val/test dataset so that every class independently
//! meets the target ratios. A record annotated with k distinct classes is
//! eligible for assignment through each of its k class buckets; within one
//! subset duplicates collapse, but a record whose buckets disagree can be
//! copied into more than one subset. That behavior is kept for
//! compatibility with the datasets this tool already produced.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{error, info};

use crate::core::dataset::{classes_in_file, resolve_image, DatasetRoot, DatasetSplit};
use crate::core::error::{DatasetError, DatasetResult};
use crate::core::operations::copy_file_if_absent;

use super::distribution::{analyze_distribution, DistributionReport};

/// Maximum deviation of the ratio sum from 1.0 accepted by [`SplitRatios`].
pub const RATIO_SUM_TOLERANCE: f64 = 0.01;

/// Target train/val/test proportions for a balancing run.
///
/// Construction validates the sum, so every `SplitRatios` value in
/// circulation is usable without further checks.
#[derive(Debug, Clone, Copy)]
pub struct SplitRatios {
    train: f64,
    val: f64,
    test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> DatasetResult<Self> {
        let sum = train + val + test;
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(DatasetError::Configuration(format!(
                "split ratios must sum to 1.0, got {} + {} + {} = {}",
                train, val, test, sum
            )));
        }
        Ok(Self { train, val, test })
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn test(&self) -> f64 {
        self.test
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.70,
            val: 0.20,
            test: 0.10,
        }
    }
}

/// An image/label pair discovered in the source dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    pub image: PathBuf,
    pub label: PathBuf,
}

/// The records accumulated for each destination subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetAssignment {
    pub train: BTreeSet<Record>,
    pub val: BTreeSet<Record>,
    pub test: BTreeSet<Record>,
}

impl SubsetAssignment {
    pub fn get(&self, split: DatasetSplit) -> &BTreeSet<Record> {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
            DatasetSplit::Test => &self.test,
        }
    }

    fn get_mut(&mut self, split: DatasetSplit) -> &mut BTreeSet<Record> {
        match split {
            DatasetSplit::Train => &mut self.train,
            DatasetSplit::Val => &mut self.val,
            DatasetSplit::Test => &mut self.test,
        }
    }

    pub fn total_records(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// Walk every subset of the source and group records by the classes they
/// contain, in ascending class-id order.
///
/// Label files with no resolvable image are logged and excluded. A label
/// line with a non-integer class id aborts the run.
pub fn collect_class_buckets(source: &DatasetRoot) -> DatasetResult<BTreeMap<u32, Vec<Record>>> {
    let mut buckets: BTreeMap<u32, Vec<Record>> = BTreeMap::new();

    for split in DatasetSplit::ALL {
        if !source.has_split(split) {
            continue;
        }
        let images_dir = source.images_dir(split);
        for label_path in source.label_files(split)? {
            let classes = classes_in_file(&label_path)?;
            if classes.is_empty() {
                continue;
            }
            let Some(stem) = label_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // resolve_image already logged the miss; the record is excluded
            let Some(image) = resolve_image(&images_dir, stem) else {
                continue;
            };
            for class_id in classes {
                buckets.entry(class_id).or_default().push(Record {
                    image: image.clone(),
                    label: label_path.clone(),
                });
            }
        }
    }

    Ok(buckets)
}

/// Shuffle each class bucket with the shared generator and cut it at
/// `floor(n * train)` and `floor(n * train) + floor(n * val)`.
///
/// Buckets are visited in ascending class-id order and the generator is
/// never reseeded between them, so the bucket order is part of the
/// observable contract: it decides which part of the random sequence each
/// bucket consumes.
pub fn assign_records(
    buckets: &BTreeMap<u32, Vec<Record>>,
    ratios: SplitRatios,
    rng: &mut StdRng,
) -> SubsetAssignment {
    let mut assignment = SubsetAssignment::default();

    for (class_id, records) in buckets {
        let mut pool = records.clone();
        pool.shuffle(rng);

        let n = pool.len();
        let train_end = (n as f64 * ratios.train()).floor() as usize;
        let val_end = train_end + (n as f64 * ratios.val()).floor() as usize;

        info!(
            "Class {}: {} records split into {} train / {} val / {} test",
            class_id,
            n,
            train_end,
            val_end - train_end,
            n - val_end
        );

        for (idx, record) in pool.into_iter().enumerate() {
            let split = if idx < train_end {
                DatasetSplit::Train
            } else if idx < val_end {
                DatasetSplit::Val
            } else {
                DatasetSplit::Test
            };
            assignment.get_mut(split).insert(record);
        }
    }

    assignment
}

fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Copy every assigned record into the destination tree, skipping files
/// that already exist so a re-run copies nothing new. A failed copy is
/// reported and the pass continues with the next file.
fn materialize(assignment: &SubsetAssignment, dest: &DatasetRoot) -> (usize, usize) {
    let mut copied = 0;
    let mut failed = 0;

    for split in DatasetSplit::ALL {
        let records = assignment.get(split);
        let images_dir = dest.images_dir(split);
        let labels_dir = dest.labels_dir(split);

        info!(
            "Materializing {} subset ({} records)",
            split.as_str(),
            records.len()
        );
        let pb = create_progress_bar(records.len() as u64, split.as_str());

        for record in records {
            for (src, dir) in [(&record.image, &images_dir), (&record.label, &labels_dir)] {
                let Some(name) = src.file_name() else {
                    continue;
                };
                match copy_file_if_absent(src, &dir.join(name)) {
                    Ok(true) => copied += 1,
                    Ok(false) => {}
                    Err(e) => {
                        error!("Failed to copy {:?}: {}", src, e);
                        failed += 1;
                    }
                }
            }
            pb.inc(1);
        }
        pb.finish();
    }

    (copied, failed)
}

/// Balance `source_root` into `dest_root` so that every class independently
/// matches `ratios`, then recompute and return the distribution of the
/// materialized output.
///
/// Identical inputs and seed produce an identical destination tree; running
/// twice into the same destination copies nothing the second time.
pub fn balance(
    source_root: &Path,
    dest_root: &Path,
    ratios: SplitRatios,
    seed: u64,
) -> DatasetResult<DistributionReport> {
    let dest = DatasetRoot::create(dest_root)?;
    let source = DatasetRoot::open(source_root);

    let buckets = collect_class_buckets(&source)?;
    info!(
        "Discovered {} classes under {:?}",
        buckets.len(),
        source_root
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let assignment = assign_records(&buckets, ratios, &mut rng);
    info!(
        "Assigned {} record memberships across train/val/test",
        assignment.total_records()
    );

    let (copied, failed) = materialize(&assignment, &dest);
    info!(
        "Copied {} files into {:?} ({} failures)",
        copied, dest_root, failed
    );

    analyze_distribution(&dest)
}
