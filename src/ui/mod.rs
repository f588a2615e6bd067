//! User interface module - terminal output and runner outputs.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Writing results where the runner picks them up

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::cli::orchestration::ReleaseOutputs;
use crate::error::Result;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success, format_outputs,
    format_summary,
};

/// Append outputs to the runner's output file (`GITHUB_OUTPUT`)
pub fn write_outputs(path: &Path, outputs: &ReleaseOutputs) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", format_outputs(outputs))?;
    Ok(())
}
