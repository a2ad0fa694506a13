//! Plain-text crawl report
//!
//! Renders `output.txt`: link and page counts followed by sorted listings of
//! downloaded, external, broken and failed URLs.

use crate::state::CrawlState;
use crate::MirrorError;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name of the report inside the output root
pub const REPORT_FILE_NAME: &str = "output.txt";

/// Formats the crawl report
///
/// Every listing comes from an ordered collection, so the same final state
/// always renders to the same text.
pub fn format_report(state: &CrawlState) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "The crawler found {} links and downloaded {} pages.",
        state.link_count(),
        state.visited().len()
    );

    section(
        &mut out,
        "The following pages were downloaded and scanned:",
        "No pages were downloaded or scanned.",
        state.visited().keys().map(|url| url.to_string()),
    );

    section(
        &mut out,
        "The following external pages were not downloaded or scanned:",
        "No external pages were found.",
        state.external().iter().map(|url| url.to_string()),
    );

    section(
        &mut out,
        "The following local pages did not contain the expected HTML structure:",
        "No broken local pages were found.",
        state.broken().iter().map(|url| url.to_string()),
    );

    section(
        &mut out,
        "The following pages could not be downloaded:",
        "No pages failed to download.",
        state
            .failed()
            .iter()
            .map(|(url, reason)| format!("{} ({})", url, reason)),
    );

    let collisions = state.collisions();
    if !collisions.is_empty() {
        let _ = writeln!(
            out,
            "The following pages were overwritten by a later page mapped to the same file:"
        );
        for collision in &collisions {
            let _ = writeln!(
                out,
                "\t{} replaced by {} ({})",
                collision.replaced,
                collision.kept,
                collision.path.display()
            );
        }
    }

    out
}

/// Writes the report to `{root}/output.txt`, creating `root` if needed
pub fn write_report(state: &CrawlState, root: &Path) -> Result<PathBuf, MirrorError> {
    std::fs::create_dir_all(root).map_err(|source| MirrorError::Write {
        path: root.to_path_buf(),
        source,
    })?;

    let path = root.join(REPORT_FILE_NAME);
    std::fs::write(&path, format_report(state)).map_err(|source| MirrorError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

fn section(
    out: &mut String,
    header: &str,
    empty: &str,
    lines: impl ExactSizeIterator<Item = String>,
) {
    if lines.len() == 0 {
        let _ = writeln!(out, "{}", empty);
        return;
    }

    let _ = writeln!(out, "{}", header);
    for line in lines {
        let _ = writeln!(out, "\t{}", line);
    }
}
