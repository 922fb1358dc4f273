use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line surface for the dataset utilities.
#[derive(Parser, Debug)]
#[command(version, about = "Prepare, audit and rebalance YOLO bounding-box datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Re-split a dataset so every class independently meets the target ratios
    Balance {
        /// Source dataset root containing train/val/test subsets
        source: PathBuf,

        /// Destination root for the balanced dataset
        dest: PathBuf,

        /// Training set proportion
        #[arg(long, default_value_t = 0.7, value_parser = parse_ratio)]
        train: f64,

        /// Validation set proportion
        #[arg(long, default_value_t = 0.2, value_parser = parse_ratio)]
        val: f64,

        /// Test set proportion
        #[arg(long, default_value_t = 0.1, value_parser = parse_ratio)]
        test: f64,

        /// Seed for random shuffling
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Ordered class names for the final report, indexed by class id
        #[arg(long = "names", value_delimiter = ',')]
        class_names: Vec<String>,
    },

    /// Print the per-class box distribution of a dataset
    Analyze {
        /// Dataset root containing train/val/test subsets
        root: PathBuf,

        /// Ordered class names, indexed by class id
        #[arg(long = "names", value_delimiter = ',')]
        class_names: Vec<String>,
    },

    /// Delete label files that have no matching image
    CleanLabels {
        /// Directory holding the images
        images_dir: PathBuf,

        /// Directory holding the label files
        labels_dir: PathBuf,
    },

    /// Delete images that have no matching label file
    CleanImages {
        /// Directory holding the images
        images_dir: PathBuf,

        /// Directory holding the label files
        labels_dir: PathBuf,
    },

    /// Copy all records containing one class into a separate directory
    Extract {
        /// Dataset directory containing images/ and labels/
        dataset_dir: PathBuf,

        /// Class id to extract
        class_id: u32,

        /// Output directory
        output_dir: PathBuf,
    },

    /// Randomly split a flat directory of images into train/test/valid
    Split {
        /// Directory of images, split in place
        source_dir: PathBuf,

        /// Training set proportion
        #[arg(long, default_value_t = 0.7, value_parser = parse_ratio)]
        train: f64,

        /// Test set proportion
        #[arg(long, default_value_t = 0.2, value_parser = parse_ratio)]
        test: f64,

        /// Validation set proportion
        #[arg(long, default_value_t = 0.1, value_parser = parse_ratio)]
        valid: f64,

        /// Seed for random shuffling
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Move labels from a flat directory next to already-split images
    Organize {
        /// Root containing train/valid/test image subdirectories
        images_root: PathBuf,

        /// Flat directory currently holding the label files
        labels_source: PathBuf,
    },

    /// Convert a JSON annotation file into YOLO label files
    Convert {
        /// JSON file mapping image ids to boxes and label names
        json_file: PathBuf,

        /// Directory to write the .txt label files into
        output_dir: PathBuf,

        /// Class mapping entry in name=id form (repeatable)
        #[arg(long = "class", value_parser = parse_class_mapping)]
        class_map: Vec<(String, u32)>,
    },
}

// Validate that a ratio is between 0.0 and 1.0
fn parse_ratio(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

fn parse_class_mapping(s: &str) -> Result<(String, u32), String> {
    let (name, id) = s
        .split_once('=')
        .ok_or_else(|| "expected a name=id pair".to_string())?;
    let id = id
        .parse::<u32>()
        .map_err(|_| format!("{:?} is not a class id", id))?;
    Ok((name.to_string(), id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_parser_bounds() {
        assert!(parse_ratio("0.5").is_ok());
        assert!(parse_ratio("1.0").is_ok());
        assert!(parse_ratio("0.0").is_ok());
        assert!(parse_ratio("-0.1").is_err());
        assert!(parse_ratio("1.1").is_err());
        assert!(parse_ratio("abc").is_err());
    }

    #[test]
    fn class_mapping_parser() {
        assert_eq!(
            parse_class_mapping("gun=3").unwrap(),
            ("gun".to_string(), 3)
        );
        assert!(parse_class_mapping("gun").is_err());
        assert!(parse_class_mapping("gun=three").is_err());
    }

    #[test]
    fn balance_arguments_parse() {
        let cli = Cli::try_parse_from([
            "yolo-dataset-tools",
            "balance",
            "source_dir",
            "dest_dir",
            "--train",
            "0.8",
            "--val",
            "0.1",
            "--test",
            "0.1",
            "--seed",
            "7",
            "--names",
            "heart,thumb_up,ok",
        ])
        .unwrap();

        match cli.command {
            Command::Balance {
                train,
                val,
                test,
                seed,
                class_names,
                ..
            } => {
                assert_eq!(train, 0.8);
                assert_eq!(val, 0.1);
                assert_eq!(test, 0.1);
                assert_eq!(seed, 7);
                assert_eq!(class_names, vec!["heart", "thumb_up", "ok"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
