//! Copy every record containing one class into its own dataset directory.

use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::core::dataset::{classes_in_file, resolve_image};
use crate::core::error::DatasetResult;

/// Copy each image/label pair under `dataset_dir/{images,labels}` that
/// contains at least one box of `target_class` into
/// `output_dir/{images,labels}`. Returns the number of records copied.
pub fn extract_class(
    dataset_dir: &Path,
    target_class: u32,
    output_dir: &Path,
) -> DatasetResult<usize> {
    let out_images = output_dir.join("images");
    let out_labels = output_dir.join("labels");
    fs::create_dir_all(&out_images)?;
    fs::create_dir_all(&out_labels)?;

    let images_dir = dataset_dir.join("images");
    let labels_dir = dataset_dir.join("labels");

    let mut label_files = Vec::new();
    for entry in fs::read_dir(&labels_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            label_files.push(path);
        }
    }
    label_files.sort();

    let mut count = 0;
    for label_path in label_files {
        if !classes_in_file(&label_path)?.contains(&target_class) {
            continue;
        }
        let Some(stem) = label_path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(image_path) = resolve_image(&images_dir, stem) else {
            continue;
        };
        let (Some(image_name), Some(label_name)) = (image_path.file_name(), label_path.file_name())
        else {
            continue;
        };

        if let Err(e) = fs::copy(&image_path, out_images.join(image_name)) {
            error!("Failed to copy {:?}: {}", image_path, e);
            continue;
        }
        if let Err(e) = fs::copy(&label_path, out_labels.join(label_name)) {
            error!("Failed to copy {:?}: {}", label_path, e);
            continue;
        }
        count += 1;
    }

    info!(
        "Extracted {} records containing class {}",
        count, target_class
    );

    Ok(count)
}
