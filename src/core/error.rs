use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error types for dataset operations
#[derive(Debug)]
pub enum DatasetError {
    /// Split ratios do not sum to 1.0 within tolerance
    Configuration(String),
    /// A label line whose first token is not an integer class id
    LabelParse {
        path: PathBuf,
        line: usize,
        token: String,
    },
    /// An annotation JSON file could not be parsed
    AnnotationJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    IoError(io::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DatasetError::LabelParse { path, line, token } => write!(
                f,
                "Parse error in {:?} line {}: {:?} is not an integer class id",
                path, line, token
            ),
            DatasetError::AnnotationJson { path, source } => {
                write!(f, "Failed to parse annotation file {:?}: {}", path, source)
            }
            DatasetError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<io::Error> for DatasetError {
    fn from(error: io::Error) -> Self {
        DatasetError::IoError(error)
    }
}
