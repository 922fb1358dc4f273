//! Plain random split of a flat image directory into train/test/valid.
//!
//! Unlike the stratified balancer this ignores labels entirely, MOVES files
//! instead of copying them, and keeps the historical `valid` directory name.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{error, info};

use crate::core::error::{DatasetError, DatasetResult};

use super::file_ops::move_file;

// The flat splitter historically also accepted gifs and matched extensions
// case-insensitively.
const FLAT_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Proportions for the flat train/test/valid split.
#[derive(Debug, Clone, Copy)]
pub struct FlatSplitRatios {
    train: f64,
    test: f64,
    valid: f64,
}

impl FlatSplitRatios {
    pub fn new(train: f64, test: f64, valid: f64) -> DatasetResult<Self> {
        let sum = train + test + valid;
        if !(0.999..=1.001).contains(&sum) {
            return Err(DatasetError::Configuration(format!(
                "split ratios must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(Self { train, test, valid })
    }
}

/// How many files each subdirectory received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatSplitSummary {
    pub train: usize,
    pub test: usize,
    pub valid: usize,
}

/// Shuffle every image directly inside `source_dir` with the seeded
/// generator and move it into a `train/`, `test/` or `valid/` subdirectory
/// created in place.
pub fn split_flat_directory(
    source_dir: &Path,
    ratios: FlatSplitRatios,
    seed: u64,
) -> DatasetResult<FlatSplitSummary> {
    let train_dir = source_dir.join("train");
    let test_dir = source_dir.join("test");
    let valid_dir = source_dir.join("valid");
    for dir in [&train_dir, &test_dir, &valid_dir] {
        fs::create_dir_all(dir)?;
    }

    let mut image_files = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lower = name.to_lowercase();
        if FLAT_IMAGE_EXTENSIONS
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
        {
            image_files.push(path);
        }
    }
    image_files.sort();

    let mut rng = StdRng::seed_from_u64(seed);
    image_files.shuffle(&mut rng);

    let total = image_files.len();
    let train_end = (total as f64 * ratios.train).floor() as usize;
    let test_end = train_end + (total as f64 * ratios.test).floor() as usize;

    let mut summary = FlatSplitSummary::default();
    for (idx, path) in image_files.iter().enumerate() {
        let Some(name) = path.file_name() else {
            continue;
        };
        let (dest_dir, counter) = if idx < train_end {
            (&train_dir, &mut summary.train)
        } else if idx < test_end {
            (&test_dir, &mut summary.test)
        } else {
            (&valid_dir, &mut summary.valid)
        };
        match move_file(path, &dest_dir.join(name)) {
            Ok(()) => *counter += 1,
            Err(e) => error!("Failed to move {:?}: {}", path, e),
        }
    }

    info!(
        "Split complete: {} train, {} test, {} valid",
        summary.train, summary.test, summary.valid
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ratios_that_do_not_sum_to_one() {
        assert!(FlatSplitRatios::new(0.7, 0.2, 0.1).is_ok());
        assert!(FlatSplitRatios::new(0.7, 0.2, 0.2).is_err());
    }

    #[test]
    fn moves_files_at_floor_boundaries() {
        let tmp = tempfile::tempdir().unwrap();
        for i in 0..10 {
            fs::write(tmp.path().join(format!("img{:02}.jpg", i)), b"").unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();

        let ratios = FlatSplitRatios::new(0.7, 0.2, 0.1).unwrap();
        let summary = split_flat_directory(tmp.path(), ratios, 42).unwrap();

        assert_eq!(
            summary,
            FlatSplitSummary {
                train: 7,
                test: 2,
                valid: 1
            }
        );
        // non-image files stay behind
        assert!(tmp.path().join("notes.txt").exists());
        let moved = fs::read_dir(tmp.path().join("train")).unwrap().count();
        assert_eq!(moved, 7);
    }

    #[test]
    fn accepts_uppercase_and_gif_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.GIF"), b"").unwrap();
        fs::write(tmp.path().join("b.Jpg"), b"").unwrap();

        let ratios = FlatSplitRatios::new(1.0, 0.0, 0.0).unwrap();
        let summary = split_flat_directory(tmp.path(), ratios, 1).unwrap();
        assert_eq!(summary.train, 2);
    }
}
