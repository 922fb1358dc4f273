//! Logging module for the dataset tools
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Dual logging (file + stdout)
//! - Log file management with timestamps

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::setup_logging;
