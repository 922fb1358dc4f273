use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use yolo_dataset_tools::core::analysis::{analyze_distribution, balance, SplitRatios};
use yolo_dataset_tools::core::dataset::{DatasetRoot, DatasetSplit};
use yolo_dataset_tools::core::error::DatasetError;

fn write_record(root: &Path, split: &str, stem: &str, label_lines: &str) {
    let images = root.join(split).join("images");
    let labels = root.join(split).join("labels");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&labels).unwrap();
    fs::write(images.join(format!("{}.jpg", stem)), b"jpg").unwrap();
    fs::write(labels.join(format!("{}.txt", stem)), label_lines).unwrap();
}

/// Collect `subset/kind/name` strings for every file in a dataset tree.
fn relative_files(root: &Path) -> BTreeSet<String> {
    let mut files = BTreeSet::new();
    for split in ["train", "val", "test"] {
        for kind in ["images", "labels"] {
            let dir = root.join(split).join(kind);
            if !dir.exists() {
                continue;
            }
            for entry in fs::read_dir(&dir).unwrap() {
                let name = entry.unwrap().file_name().to_string_lossy().into_owned();
                files.insert(format!("{}/{}/{}", split, kind, name));
            }
        }
    }
    files
}

fn subsets_containing_label(dest: &Path, stem: &str) -> Vec<&'static str> {
    ["train", "val", "test"]
        .into_iter()
        .filter(|split| {
            dest.join(split)
                .join("labels")
                .join(format!("{}.txt", stem))
                .exists()
        })
        .collect()
}

#[test]
fn stratified_split_meets_per_class_floor_counts() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..10 {
        write_record(&source, "train", &format!("a{:02}", i), "0 0.5 0.5 0.1 0.1");
    }
    for i in 0..5 {
        write_record(&source, "train", &format!("b{:02}", i), "1 0.5 0.5 0.1 0.1");
    }

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    let report = balance(&source, &dest, ratios, 42).unwrap();

    // class 0: 10 records cut 7/2/1, class 1: 5 records cut 3/1/1
    assert_eq!(report.train.get(&0), Some(&7));
    assert_eq!(report.val.get(&0), Some(&2));
    assert_eq!(report.test.get(&0), Some(&1));
    assert_eq!(report.train.get(&1), Some(&3));
    assert_eq!(report.val.get(&1), Some(&1));
    assert_eq!(report.test.get(&1), Some(&1));
    assert_eq!(report.grand_total(), 15);
}

#[test]
fn same_seed_produces_identical_trees() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..12 {
        let class = i % 3;
        write_record(
            &source,
            "train",
            &format!("r{:02}", i),
            &format!("{} 0.5 0.5 0.1 0.1", class),
        );
    }

    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    let dest_a = tmp.path().join("dest_a");
    let dest_b = tmp.path().join("dest_b");
    let report_a = balance(&source, &dest_a, ratios, 1234).unwrap();
    let report_b = balance(&source, &dest_b, ratios, 1234).unwrap();

    assert_eq!(relative_files(&dest_a), relative_files(&dest_b));
    assert_eq!(report_a, report_b);
}

#[test]
fn rerun_into_same_destination_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..8 {
        write_record(&source, "val", &format!("r{}", i), "0 0.5 0.5 0.1 0.1");
    }

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    let first = balance(&source, &dest, ratios, 5).unwrap();
    let files_after_first = relative_files(&dest);
    let second = balance(&source, &dest, ratios, 5).unwrap();

    assert_eq!(files_after_first, relative_files(&dest));
    assert_eq!(first, second);
}

#[test]
fn label_without_image_is_excluded_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..3 {
        write_record(&source, "train", &format!("ok{}", i), "0 0.5 0.5 0.1 0.1");
    }
    fs::write(
        source.join("train").join("labels").join("ghost.txt"),
        "0 0.5 0.5 0.1 0.1",
    )
    .unwrap();

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    balance(&source, &dest, ratios, 9).unwrap();

    assert!(subsets_containing_label(&dest, "ghost").is_empty());
}

#[test]
fn multi_class_records_keep_image_label_pairing() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..6 {
        write_record(&source, "train", &format!("s{}", i), "0 0.5 0.5 0.1 0.1");
    }
    // records belonging to both class 0 and class 1
    for i in 0..4 {
        write_record(
            &source,
            "train",
            &format!("m{}", i),
            "0 0.5 0.5 0.1 0.1\n1 0.3 0.3 0.1 0.1",
        );
    }

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    balance(&source, &dest, ratios, 77).unwrap();

    // single-class records land in exactly one subset
    for i in 0..6 {
        assert_eq!(subsets_containing_label(&dest, &format!("s{}", i)).len(), 1);
    }
    // a two-class record lands in one subset, or two when its buckets
    // disagree; never zero, never three
    for i in 0..4 {
        let hits = subsets_containing_label(&dest, &format!("m{}", i)).len();
        assert!((1..=2).contains(&hits), "m{} appeared in {} subsets", i, hits);
    }

    // every label file has a same-stem image next to it and vice versa
    for split in ["train", "val", "test"] {
        let images: BTreeSet<String> = fs::read_dir(dest.join(split).join("images"))
            .unwrap()
            .map(|e| {
                let p = e.unwrap().path();
                p.file_stem().unwrap().to_string_lossy().into_owned()
            })
            .collect();
        let labels: BTreeSet<String> = fs::read_dir(dest.join(split).join("labels"))
            .unwrap()
            .map(|e| {
                let p = e.unwrap().path();
                p.file_stem().unwrap().to_string_lossy().into_owned()
            })
            .collect();
        assert_eq!(images, labels, "pairing broken in {}", split);
    }
}

#[test]
fn empty_source_still_creates_the_output_skeleton() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("does_not_exist");
    let dest = tmp.path().join("dest");

    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    let report = balance(&source, &dest, ratios, 0).unwrap();

    assert_eq!(report.grand_total(), 0);
    let root = DatasetRoot::open(&dest);
    for split in DatasetSplit::ALL {
        assert!(root.images_dir(split).is_dir());
        assert!(root.labels_dir(split).is_dir());
    }
}

#[test]
fn malformed_class_id_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    write_record(&source, "train", "good", "0 0.5 0.5 0.1 0.1");
    write_record(&source, "train", "bad", "zero 0.5 0.5 0.1 0.1");

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    match balance(&source, &dest, ratios, 3) {
        Err(DatasetError::LabelParse { token, .. }) => assert_eq!(token, "zero"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn report_matches_standalone_analysis_of_the_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source");
    for i in 0..9 {
        write_record(
            &source,
            "test",
            &format!("r{}", i),
            &format!("{} 0.5 0.5 0.1 0.1", i % 2),
        );
    }

    let dest = tmp.path().join("dest");
    let ratios = SplitRatios::new(0.7, 0.2, 0.1).unwrap();
    let report = balance(&source, &dest, ratios, 11).unwrap();

    let recomputed = analyze_distribution(&DatasetRoot::open(&dest)).unwrap();
    assert_eq!(report, recomputed);
}
