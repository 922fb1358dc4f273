use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Image extensions recognized when resolving the sibling image of a label
/// file. Matching is case-sensitive and the first hit in this order wins.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetSplit {
    Train,
    Val,
    Test,
}

impl DatasetSplit {
    pub const ALL: [DatasetSplit; 3] = [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test];

    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
            DatasetSplit::Test => "test",
        }
    }
}

/// A dataset root directory with the `<root>/{train,val,test}/{images,labels}`
/// layout. Construction records which subset directories actually exist, so
/// callers can treat missing subsets as empty instead of erroring on them.
#[derive(Debug, Clone)]
pub struct DatasetRoot {
    path: PathBuf,
}

impl DatasetRoot {
    /// Open an existing dataset root. Missing subset directories are
    /// tolerated; they are logged and treated as empty.
    pub fn open(path: &Path) -> Self {
        let root = Self {
            path: path.to_path_buf(),
        };
        for split in DatasetSplit::ALL {
            if !root.has_split(split) {
                info!("Subset {:?} not present under {:?}", split.as_str(), path);
            }
        }
        root
    }

    /// Create the full six-directory skeleton under `path`. Fails if any
    /// directory cannot be created, since nothing downstream can proceed
    /// without the output layout.
    pub fn create(path: &Path) -> io::Result<Self> {
        for split in DatasetSplit::ALL {
            fs::create_dir_all(path.join(split.as_str()).join("images"))?;
            fs::create_dir_all(path.join(split.as_str()).join("labels"))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn images_dir(&self, split: DatasetSplit) -> PathBuf {
        self.path.join(split.as_str()).join("images")
    }

    pub fn labels_dir(&self, split: DatasetSplit) -> PathBuf {
        self.path.join(split.as_str()).join("labels")
    }

    /// A subset counts as present when its `labels/` directory exists.
    pub fn has_split(&self, split: DatasetSplit) -> bool {
        self.labels_dir(split).exists()
    }

    /// All `.txt` label files of a subset, sorted by file name so that every
    /// run visits them in the same order regardless of directory order.
    pub fn label_files(&self, split: DatasetSplit) -> io::Result<Vec<PathBuf>> {
        let labels_dir = self.labels_dir(split);
        let mut files = Vec::new();
        for entry in fs::read_dir(&labels_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Resolve the image belonging to a label stem by probing the recognized
/// extensions in their fixed order.
pub fn resolve_image(images_dir: &Path, stem: &str) -> Option<PathBuf> {
    for ext in IMAGE_EXTENSIONS {
        let candidate = images_dir.join(format!("{}.{}", stem, ext));
        if candidate.exists() {
            return Some(candidate);
        }
    }
    warn!("No image found for stem {:?} in {:?}", stem, images_dir);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_names() {
        assert_eq!(DatasetSplit::Train.as_str(), "train");
        assert_eq!(DatasetSplit::Val.as_str(), "val");
        assert_eq!(DatasetSplit::Test.as_str(), "test");
    }

    #[test]
    fn create_builds_six_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = DatasetRoot::create(&tmp.path().join("out")).unwrap();
        for split in DatasetSplit::ALL {
            assert!(root.images_dir(split).is_dir());
            assert!(root.labels_dir(split).is_dir());
            assert!(root.has_split(split));
        }
    }

    #[test]
    fn resolve_image_prefers_extension_order() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("frame.png"), b"").unwrap();
        fs::write(tmp.path().join("frame.jpg"), b"").unwrap();
        let resolved = resolve_image(tmp.path(), "frame").unwrap();
        assert_eq!(resolved, tmp.path().join("frame.jpg"));
        assert!(resolve_image(tmp.path(), "missing").is_none());
    }

    #[test]
    fn label_files_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = DatasetRoot::create(tmp.path()).unwrap();
        let labels = root.labels_dir(DatasetSplit::Train);
        fs::write(labels.join("b.txt"), b"").unwrap();
        fs::write(labels.join("a.txt"), b"").unwrap();
        fs::write(labels.join("c.md"), b"").unwrap();
        let files = root.label_files(DatasetSplit::Train).unwrap();
        assert_eq!(files, vec![labels.join("a.txt"), labels.join("b.txt")]);
    }
}
