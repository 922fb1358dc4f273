use std::collections::HashMap;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use yolo_dataset_tools::cli::{Cli, Command};
use yolo_dataset_tools::core::analysis::{analyze_distribution, balance, scan_orphans, SplitRatios};
use yolo_dataset_tools::core::conversion::convert_json_annotations;
use yolo_dataset_tools::core::dataset::DatasetRoot;
use yolo_dataset_tools::core::operations::{
    extract_class, organize_labels, remove_files, split_flat_directory, FlatSplitRatios,
};
use yolo_dataset_tools::logging::setup_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Balance {
            source,
            dest,
            train,
            val,
            test,
            seed,
            class_names,
        } => {
            let ratios = SplitRatios::new(train, val, test)?;
            let report = balance(&source, &dest, ratios, seed)?;
            println!("\nBalanced dataset distribution:");
            print!("{}", report.render(&class_names));
        }
        Command::Analyze { root, class_names } => {
            let report = analyze_distribution(&DatasetRoot::open(&root))?;
            print!("{}", report.render(&class_names));
        }
        Command::CleanLabels {
            images_dir,
            labels_dir,
        } => {
            let scan = scan_orphans(&images_dir, &labels_dir)?;
            let deleted = remove_files(&scan.orphaned_labels);
            println!("Deleted {} labels without a matching image", deleted);
            println!("Remaining labels: {}", scan.label_count - deleted);
            println!("Images: {}", scan.image_count);
        }
        Command::CleanImages {
            images_dir,
            labels_dir,
        } => {
            let scan = scan_orphans(&images_dir, &labels_dir)?;
            let deleted = remove_files(&scan.unlabeled_images);
            println!(
                "Checked {} images, deleted {} without labels",
                scan.image_count, deleted
            );
            println!("Remaining images: {}", scan.image_count - deleted);
            println!("Labels: {}", scan.label_count);
        }
        Command::Extract {
            dataset_dir,
            class_id,
            output_dir,
        } => {
            let count = extract_class(&dataset_dir, class_id, &output_dir)?;
            println!("Extracted {} records containing class {}", count, class_id);
        }
        Command::Split {
            source_dir,
            train,
            test,
            valid,
            seed,
        } => {
            let ratios = FlatSplitRatios::new(train, test, valid)?;
            let summary = split_flat_directory(&source_dir, ratios, seed)?;
            println!(
                "Split complete: {} train, {} test, {} valid",
                summary.train, summary.test, summary.valid
            );
        }
        Command::Organize {
            images_root,
            labels_source,
        } => {
            let summary = organize_labels(&images_root, &labels_source)?;
            println!(
                "Moved {} labels into place ({} images had no label)",
                summary.moved, summary.missing
            );
        }
        Command::Convert {
            json_file,
            output_dir,
            class_map,
        } => {
            let class_map: HashMap<String, u32> = class_map.into_iter().collect();
            let count = convert_json_annotations(&json_file, &output_dir, &class_map)?;
            println!("Converted {} annotation entries", count);
        }
    }
    Ok(())
}
