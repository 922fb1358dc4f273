//! Pair a flat directory of label files with already-split images.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use super::file_ops::move_file;

/// Outcome of an organize pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    pub moved: usize,
    pub missing: usize,
}

/// For every image under `<images_root>/{train,valid,test}`, move the
/// same-stem `.txt` file from `labels_source` into a `labels/<split>`
/// directory created next to `images_root`. An image without a label is a
/// warning, not an error.
pub fn organize_labels(images_root: &Path, labels_source: &Path) -> io::Result<OrganizeSummary> {
    let labels_root = images_root
        .parent()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "images root has no parent directory",
            )
        })?
        .join("labels");

    let mut summary = OrganizeSummary::default();

    for split in ["train", "valid", "test"] {
        let images_split_dir = images_root.join(split);
        let labels_split_dir = labels_root.join(split);
        fs::create_dir_all(&labels_split_dir)?;

        if !images_split_dir.exists() {
            continue;
        }

        let mut entries: Vec<_> = fs::read_dir(&images_split_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for path in entries {
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let label_name = format!("{}.txt", stem);
            let source_label = labels_source.join(&label_name);
            if source_label.exists() {
                match move_file(&source_label, &labels_split_dir.join(&label_name)) {
                    Ok(()) => summary.moved += 1,
                    Err(e) => warn!("Failed to move label {:?}: {}", source_label, e),
                }
            } else {
                warn!("No matching label file for {:?}", path);
                summary.missing += 1;
            }
        }
    }

    info!(
        "Organized {} labels ({} images had none)",
        summary.moved, summary.missing
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_matching_labels_and_counts_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let images_root = tmp.path().join("dataset").join("images");
        let labels_source = tmp.path().join("incoming");
        fs::create_dir_all(images_root.join("train")).unwrap();
        fs::create_dir_all(images_root.join("valid")).unwrap();
        fs::create_dir_all(&labels_source).unwrap();

        fs::write(images_root.join("train").join("a.jpg"), b"").unwrap();
        fs::write(images_root.join("valid").join("b.jpg"), b"").unwrap();
        fs::write(labels_source.join("a.txt"), "0 0.5 0.5 0.1 0.1").unwrap();

        let summary = organize_labels(&images_root, &labels_source).unwrap();
        assert_eq!(
            summary,
            OrganizeSummary {
                moved: 1,
                missing: 1
            }
        );

        let moved_to = tmp
            .path()
            .join("dataset")
            .join("labels")
            .join("train")
            .join("a.txt");
        assert!(moved_to.exists());
        assert!(!labels_source.join("a.txt").exists());
    }
}
