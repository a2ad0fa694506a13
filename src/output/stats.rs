//! Console statistics for a finished crawl

use crate::output::MirrorStats;
use crate::state::CrawlState;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Anchors seen across all processed pages
    pub total_links: u64,

    /// Pages stored in the mirror
    pub downloaded: usize,

    pub external: usize,
    pub broken: usize,
    pub failed: usize,
    pub collisions: usize,

    /// Files actually written / not written
    pub mirror: MirrorStats,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStatistics {
    /// Collects statistics from a finished crawl
    pub fn collect(state: &CrawlState, mirror: MirrorStats) -> Self {
        Self {
            total_links: state.link_count(),
            downloaded: state.visited().len(),
            external: state.external().len(),
            broken: state.broken().len(),
            failed: state.failed().len(),
            collisions: state.collisions().len(),
            mirror,
            started_at: state.started_at(),
            finished_at: Utc::now(),
        }
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of fetched pages that ended up in the mirror
    pub fn success_rate(&self) -> f64 {
        let attempted = self.downloaded + self.broken + self.failed;
        if attempted == 0 {
            0.0
        } else {
            (self.downloaded as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Duration: {} seconds", stats.duration_seconds());
    println!();

    println!("Overview:");
    println!("  Links found: {}", stats.total_links);
    println!("  Pages downloaded: {}", stats.downloaded);
    println!("  External links: {}", stats.external);
    println!("  Broken pages: {}", stats.broken);
    println!("  Failed downloads: {}", stats.failed);
    println!();

    println!("Mirror:");
    println!("  Files written: {}", stats.mirror.written);
    if stats.mirror.failed > 0 {
        println!("  Files not written: {}", stats.mirror.failed);
    }
    if stats.collisions > 0 {
        println!("  Path collisions: {}", stats.collisions);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} fetched pages stored)",
        stats.success_rate(),
        stats.downloaded,
        stats.downloaded + stats.broken + stats.failed
    );
}
