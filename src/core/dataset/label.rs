use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::core::error::{DatasetError, DatasetResult};

/// One bounding box in YOLO label format. Geometry is normalized to [0,1].
#[derive(Debug, Clone, PartialEq)]
pub struct YoloBox {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloBox {
    /// Render as a YOLO label line: `<class_id> <x> <y> <w> <h>` with six
    /// decimal places on the geometry.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Read the class id of every non-blank annotation line, one entry per line.
///
/// A line whose first token is not an integer aborts the whole read, since
/// silently dropping a line would corrupt any count built on top of it.
pub fn read_class_ids(label_path: &Path) -> DatasetResult<Vec<u32>> {
    let content = fs::read_to_string(label_path)?;

    let mut class_ids = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let Some(token) = line.split_whitespace().next() else {
            continue; // blank line
        };
        let class_id = token
            .parse::<u32>()
            .map_err(|_| DatasetError::LabelParse {
                path: label_path.to_path_buf(),
                line: idx + 1,
                token: token.to_string(),
            })?;
        class_ids.push(class_id);
    }

    Ok(class_ids)
}

/// The set of distinct classes annotated in a label file.
pub fn classes_in_file(label_path: &Path) -> DatasetResult<BTreeSet<u32>> {
    Ok(read_class_ids(label_path)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_label(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_one_class_per_line_and_skips_blanks() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_label(
            tmp.path(),
            "a.txt",
            "0 0.5 0.5 0.1 0.1\n\n1 0.2 0.2 0.05 0.05\n0 0.8 0.8 0.1 0.1\n",
        );
        assert_eq!(read_class_ids(&path).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn distinct_classes_collapse_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_label(tmp.path(), "a.txt", "2 0 0 0 0\n0 0 0 0 0\n2 0 0 0 0");
        let classes = classes_in_file(&path).unwrap();
        assert_eq!(classes.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn non_integer_class_id_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_label(tmp.path(), "bad.txt", "0 0.5 0.5 0.1 0.1\ncat 0 0 0 0");
        match read_class_ids(&path) {
            Err(DatasetError::LabelParse { line, token, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "cat");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn box_line_has_six_decimal_places() {
        let b = YoloBox {
            class_id: 3,
            x_center: 0.5,
            y_center: 0.25,
            width: 1.0,
            height: 0.125,
        };
        assert_eq!(b.to_line(), "3 0.500000 0.250000 1.000000 0.125000");
    }
}
