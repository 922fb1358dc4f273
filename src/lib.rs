//! Utilities for preparing, auditing, and rebalancing YOLO bounding-box
//! image-annotation datasets.
//!
//! The core piece is the class-stratified balancer, which re-splits a
//! train/val/test dataset so that every class independently meets the
//! target proportions. Around it sit small single-pass tools for cleaning
//! orphaned files, extracting single classes, plain random splits, pairing
//! labels with split images, and importing JSON annotations.

pub mod cli;
pub mod core;
pub mod logging;

// Re-export the commonly used entry points
pub use crate::core::analysis::{analyze_distribution, balance, DistributionReport, SplitRatios};
pub use crate::core::dataset::{DatasetRoot, DatasetSplit};
