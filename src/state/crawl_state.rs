//! Crawl state record owned by the coordinator
//!
//! All accumulators of one crawl run live here: the pending stack, the set of
//! claimed URLs, the visited map, the external, broken and failed records, the
//! discovered-link counter and the index of mapped output paths. The
//! coordinator is the only writer.

use crate::state::PageState;
use crate::url::{CanonicalUrl, LinkRoute};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A page stored in the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedEntry {
    /// Destination file under the output root
    pub path: PathBuf,
    /// Bytes written to `path`
    pub content: Vec<u8>,
}

/// Two visited URLs that mapped to the same output file
///
/// The mirror is written in sorted URL order, so `kept` is the URL that
/// sorts last among those sharing `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    pub path: PathBuf,
    /// The URL whose file is overwritten
    pub replaced: CanonicalUrl,
    /// The URL whose content ends up on disk
    pub kept: CanonicalUrl,
}

/// Mutable state of a single crawl run
#[derive(Debug)]
pub struct CrawlState {
    /// LIFO worklist; duplicates are allowed and filtered at pop time
    pending: Vec<CanonicalUrl>,

    /// Every URL ever handed to the transport, marked before dispatch
    claimed: HashSet<CanonicalUrl>,

    visited: BTreeMap<CanonicalUrl, VisitedEntry>,
    external: BTreeSet<CanonicalUrl>,
    broken: BTreeSet<CanonicalUrl>,
    failed: BTreeMap<CanonicalUrl, String>,

    /// Output path -> URL that first mapped to it
    paths: HashMap<PathBuf, CanonicalUrl>,

    /// Number of anchors seen across all processed pages
    link_count: u64,

    started_at: DateTime<Utc>,
}

impl CrawlState {
    /// Creates a state whose worklist holds only `start`
    pub fn new(start: CanonicalUrl) -> Self {
        Self {
            pending: vec![start],
            claimed: HashSet::new(),
            visited: BTreeMap::new(),
            external: BTreeSet::new(),
            broken: BTreeSet::new(),
            failed: BTreeMap::new(),
            paths: HashMap::new(),
            link_count: 0,
            started_at: Utc::now(),
        }
    }

    /// Pops the most recently pushed unclaimed URL and claims it
    ///
    /// Already claimed URLs are discarded on the way. Returns `None` once the
    /// worklist is exhausted.
    pub fn claim_next(&mut self) -> Option<CanonicalUrl> {
        while let Some(url) = self.pending.pop() {
            if self.claimed.insert(url.clone()) {
                return Some(url);
            }
            tracing::trace!("Skipping already claimed {}", url);
        }
        None
    }

    /// Records one anchor found on a processed page
    ///
    /// Crawlable links that have not been claimed are pushed onto the
    /// worklist; out-of-scope links go to the external set.
    pub fn record_link(&mut self, url: CanonicalUrl, route: LinkRoute) {
        self.link_count += 1;

        match route {
            LinkRoute::Crawl => {
                if !self.claimed.contains(&url) {
                    self.pending.push(url);
                }
            }
            LinkRoute::External => {
                if !self.visited.contains_key(&url) {
                    self.external.insert(url);
                }
            }
        }
    }

    /// Stores a successfully fetched page
    ///
    /// A second URL mapping to an already used path is logged; both entries
    /// are kept and [`CrawlState::collisions`] reports the outcome.
    pub fn record_visited(&mut self, url: CanonicalUrl, path: PathBuf, content: Vec<u8>) {
        match self.paths.get(&path) {
            Some(first) if *first != url => {
                tracing::warn!(
                    "{} and {} both map to {}; only one is kept on disk",
                    first,
                    url,
                    path.display()
                );
            }
            Some(_) => {}
            None => {
                self.paths.insert(path.clone(), url.clone());
            }
        }

        self.visited.insert(url, VisitedEntry { path, content });
    }

    /// Records an HTML page that lacked the main-content region
    pub fn record_broken(&mut self, url: CanonicalUrl) {
        self.broken.insert(url);
    }

    /// Records a transport failure for `url`
    pub fn record_failed(&mut self, url: CanonicalUrl, reason: impl Into<String>) {
        self.failed.insert(url, reason.into());
    }

    /// Returns the state of `url`, or `None` if it was never claimed
    pub fn state_of(&self, url: &CanonicalUrl) -> Option<PageState> {
        if self.visited.contains_key(url) {
            Some(PageState::Visited)
        } else if self.broken.contains(url) {
            Some(PageState::Broken)
        } else if self.failed.contains_key(url) {
            Some(PageState::Failed)
        } else if self.claimed.contains(url) {
            Some(PageState::Fetching)
        } else {
            None
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited(&self) -> &BTreeMap<CanonicalUrl, VisitedEntry> {
        &self.visited
    }

    pub fn external(&self) -> &BTreeSet<CanonicalUrl> {
        &self.external
    }

    pub fn broken(&self) -> &BTreeSet<CanonicalUrl> {
        &self.broken
    }

    pub fn failed(&self) -> &BTreeMap<CanonicalUrl, String> {
        &self.failed
    }

    /// Visited URLs that share an output path, ordered by path then URL
    ///
    /// Derived from the visited map alone, so the result does not depend on
    /// the order in which fetches completed.
    pub fn collisions(&self) -> Vec<PathCollision> {
        let mut by_path: BTreeMap<&Path, Vec<&CanonicalUrl>> = BTreeMap::new();
        for (url, entry) in &self.visited {
            by_path.entry(entry.path.as_path()).or_default().push(url);
        }

        let mut collisions = Vec::new();
        for (path, urls) in by_path {
            let Some((kept, replaced)) = urls.split_last() else {
                continue;
            };
            for url in replaced {
                collisions.push(PathCollision {
                    path: path.to_path_buf(),
                    replaced: (*url).clone(),
                    kept: (*kept).clone(),
                });
            }
        }
        collisions
    }

    pub fn link_count(&self) -> u64 {
        self.link_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
