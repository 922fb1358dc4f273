//! Import of JSON annotations into YOLO label files.
//!
//! The interchange format maps an image id to its boxes in
//! `[x_top_left, y_top_left, width, height]` form with normalized
//! coordinates, plus the label names present in the image.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::dataset::YoloBox;
use crate::core::error::{DatasetError, DatasetResult};

/// One image's annotations in the JSON interchange format.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationEntry {
    #[serde(default)]
    pub bboxes: Vec<[f64; 4]>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Convert a top-left based box to YOLO center form, clamping every value
/// into [0,1].
fn bbox_to_yolo(bbox: [f64; 4]) -> (f64, f64, f64, f64) {
    let [x_tl, y_tl, width, height] = bbox;
    let x_center = (x_tl + width / 2.0).clamp(0.0, 1.0);
    let y_center = (y_tl + height / 2.0).clamp(0.0, 1.0);
    (
        x_center,
        y_center,
        width.clamp(0.0, 1.0),
        height.clamp(0.0, 1.0),
    )
}

/// Write one YOLO label file per entry of `json_path` into `output_dir`.
///
/// The entry's first label name decides the class id for all of its boxes;
/// names missing from `class_map` fall back to class 0. Returns the number
/// of entries converted.
pub fn convert_json_annotations(
    json_path: &Path,
    output_dir: &Path,
    class_map: &HashMap<String, u32>,
) -> DatasetResult<usize> {
    fs::create_dir_all(output_dir)?;

    let content = fs::read_to_string(json_path)?;
    let entries: BTreeMap<String, AnnotationEntry> =
        serde_json::from_str(&content).map_err(|source| DatasetError::AnnotationJson {
            path: json_path.to_path_buf(),
            source,
        })?;

    let mut converted = 0;
    for (image_id, entry) in entries {
        let class_id = entry
            .labels
            .first()
            .and_then(|name| class_map.get(name).copied())
            .unwrap_or(0);

        let lines: Vec<String> = entry
            .bboxes
            .iter()
            .map(|&bbox| {
                let (x_center, y_center, width, height) = bbox_to_yolo(bbox);
                YoloBox {
                    class_id,
                    x_center,
                    y_center,
                    width,
                    height,
                }
                .to_line()
            })
            .collect();

        fs::write(output_dir.join(format!("{}.txt", image_id)), lines.join("\n"))?;
        info!("Converted annotations for {}", image_id);
        converted += 1;
    }

    Ok(converted)
}
