//! Output module for the finished crawl
//!
//! This module handles:
//! - Mapping canonical URLs to collision-checked local paths
//! - Rendering the `output.txt` report
//! - Writing the mirror tree
//! - Console statistics

mod mirror;
mod paths;
mod report;
pub mod stats;

pub use mirror::{write_mirror, MirrorStats};
pub use paths::map_to_path;
pub use report::{format_report, write_report, REPORT_FILE_NAME};
pub use stats::{print_statistics, CrawlStatistics};

use crate::state::CrawlState;
use crate::MirrorError;
use std::path::Path;

/// Writes the report and then the mirror for a finished crawl
///
/// Reads the crawl state only; it is meant to run once, after the
/// worklist is exhausted.
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Report written; mirror written as far as possible
/// * `Err(MirrorError)` - The report itself could not be written
pub fn export_results(state: &CrawlState, root: &Path) -> Result<CrawlStatistics, MirrorError> {
    write_report(state, root)?;

    let mirror = write_mirror(state);
    if mirror.failed > 0 {
        tracing::warn!(
            "{} of {} mirror files could not be written",
            mirror.failed,
            mirror.written + mirror.failed
        );
    }

    Ok(CrawlStatistics::collect(state, mirror))
}
