//! Per-class box counting and the distribution report table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::core::dataset::{read_class_ids, DatasetRoot, DatasetSplit};
use crate::core::error::DatasetResult;

/// Box counts per class id for each subset of a dataset. Counts are per
/// annotation line, so a file with three boxes of one class contributes
/// three to that class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    pub train: BTreeMap<u32, usize>,
    pub val: BTreeMap<u32, usize>,
    pub test: BTreeMap<u32, usize>,
}

impl DistributionReport {
    pub fn get(&self, split: DatasetSplit) -> &BTreeMap<u32, usize> {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
            DatasetSplit::Test => &self.test,
        }
    }

    fn get_mut(&mut self, split: DatasetSplit) -> &mut BTreeMap<u32, usize> {
        match split {
            DatasetSplit::Train => &mut self.train,
            DatasetSplit::Val => &mut self.val,
            DatasetSplit::Test => &mut self.test,
        }
    }

    /// Every class id seen in any subset.
    pub fn class_ids(&self) -> BTreeSet<u32> {
        let mut ids = BTreeSet::new();
        for split in DatasetSplit::ALL {
            ids.extend(self.get(split).keys().copied());
        }
        ids
    }

    pub fn class_total(&self, class_id: u32) -> usize {
        DatasetSplit::ALL
            .iter()
            .map(|&split| self.get(split).get(&class_id).copied().unwrap_or(0))
            .sum()
    }

    pub fn subset_total(&self, split: DatasetSplit) -> usize {
        self.get(split).values().sum()
    }

    pub fn grand_total(&self) -> usize {
        DatasetSplit::ALL
            .iter()
            .map(|&split| self.subset_total(split))
            .sum()
    }

    /// Render as a fixed-width table sorted by ascending class id, with a
    /// totals row. When `class_names` is non-empty a name column is added;
    /// ids beyond its length render numerically.
    pub fn render(&self, class_names: &[String]) -> String {
        let with_names = !class_names.is_empty();

        let mut header = format!("| {:<5} |", "class");
        if with_names {
            let _ = write!(header, " {:<20} |", "name");
        }
        for title in ["train", "val", "test", "total"] {
            let _ = write!(header, " {:<8} |", title);
        }
        let rule = format!("|{}|", "-".repeat(header.len() - 2));

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        for class_id in self.class_ids() {
            let mut row = format!("| {:<5} |", class_id);
            if with_names {
                let name = class_names
                    .get(class_id as usize)
                    .cloned()
                    .unwrap_or_else(|| class_id.to_string());
                let _ = write!(row, " {:<20} |", name);
            }
            for split in DatasetSplit::ALL {
                let count = self.get(split).get(&class_id).copied().unwrap_or(0);
                let _ = write!(row, " {:<8} |", count);
            }
            let _ = write!(row, " {:<8} |", self.class_total(class_id));
            out.push_str(&row);
            out.push('\n');
        }

        out.push_str(&rule);
        out.push('\n');

        let mut totals = format!("| {:<5} |", "total");
        if with_names {
            let _ = write!(totals, " {:<20} |", "");
        }
        for split in DatasetSplit::ALL {
            let _ = write!(totals, " {:<8} |", self.subset_total(split));
        }
        let _ = write!(totals, " {:<8} |", self.grand_total());
        out.push_str(&totals);
        out.push('\n');

        out
    }
}

/// Count the boxes of every class in every subset of `root`. Missing
/// subsets contribute nothing.
pub fn analyze_distribution(root: &DatasetRoot) -> DatasetResult<DistributionReport> {
    let mut report = DistributionReport::default();

    for split in DatasetSplit::ALL {
        if !root.has_split(split) {
            continue;
        }
        for label_path in root.label_files(split)? {
            for class_id in read_class_ids(&label_path)? {
                *report.get_mut(split).entry(class_id).or_insert(0) += 1;
            }
        }
    }

    Ok(report)
}
