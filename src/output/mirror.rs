//! Mirror persistence
//!
//! Writes every visited entry's bytes to its mapped path. A file that cannot
//! be written is logged and skipped; the rest of the mirror is still written.

use crate::state::CrawlState;
use crate::MirrorError;
use std::path::Path;

/// Outcome of writing the mirror tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Files written successfully
    pub written: usize,
    /// Files that could not be written
    pub failed: usize,
}

/// Writes all visited entries to disk in sorted URL order
///
/// When two URLs share a path the one sorting later ends up on disk.
pub fn write_mirror(state: &CrawlState) -> MirrorStats {
    let mut stats = MirrorStats::default();

    for (url, entry) in state.visited() {
        match write_file(&entry.path, &entry.content) {
            Ok(()) => {
                tracing::debug!("Wrote {} -> {}", url, entry.path.display());
                stats.written += 1;
            }
            Err(e) => {
                tracing::error!("Failed to mirror {}: {}", url, e);
                stats.failed += 1;
            }
        }
    }

    stats
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), MirrorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| MirrorError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, content).map_err(|source| MirrorError::Write {
        path: path.to_path_buf(),
        source,
    })
}
