//! Orphan detection: images without labels and labels without images.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::dataset::IMAGE_EXTENSIONS;

/// Result of pairing an images directory with a labels directory by stem.
#[derive(Debug, Clone, Default)]
pub struct OrphanScan {
    /// Label files whose stem matches no image
    pub orphaned_labels: Vec<PathBuf>,
    /// Image files whose stem matches no label
    pub unlabeled_images: Vec<PathBuf>,
    pub image_count: usize,
    pub label_count: usize,
}

// Cleanup accepts any case on the extension, unlike balancing.
fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

fn collect_stems(
    dir: &Path,
    extensions: &[&str],
) -> io::Result<(BTreeSet<String>, Vec<PathBuf>)> {
    let mut stems = BTreeSet::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !has_extension(name, extensions) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(stem.to_string());
            files.push(path);
        }
    }
    files.sort();
    Ok((stems, files))
}

/// Scan both directories and report files on either side that have no
/// same-stem counterpart on the other. No mutation happens here; deletion
/// is the caller's decision.
pub fn scan_orphans(images_dir: &Path, labels_dir: &Path) -> io::Result<OrphanScan> {
    let (image_stems, images) = collect_stems(images_dir, &IMAGE_EXTENSIONS)?;
    let (label_stems, labels) = collect_stems(labels_dir, &["txt"])?;

    let scan = OrphanScan {
        image_count: images.len(),
        label_count: labels.len(),
        orphaned_labels: labels
            .into_iter()
            .filter(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| !image_stems.contains(stem))
            })
            .collect(),
        unlabeled_images: images
            .into_iter()
            .filter(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| !label_stems.contains(stem))
            })
            .collect(),
    };

    info!(
        "Scanned {} images and {} labels: {} labels without images, {} images without labels",
        scan.image_count,
        scan.label_count,
        scan.orphaned_labels.len(),
        scan.unlabeled_images.len()
    );

    Ok(scan)
}
