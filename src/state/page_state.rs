/// Page state definitions for tracking crawl progress
///
/// Every canonical URL the crawl has claimed is in exactly one of these states.
use std::fmt;

/// Represents the current state of a claimed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Claimed by the coordinator; the fetch is in flight
    Fetching,

    // ===== Terminal Success States =====
    /// Fetched, classified and stored in the mirror
    Visited,

    // ===== Terminal Error States =====
    /// HTML page without the expected main-content region
    Broken,

    /// Transport failure (network error or non-2xx status)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fetching)
    }

    /// Returns true if the page ended up in the mirror
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Broken | Self::Failed)
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Visited => "visited",
            Self::Broken => "broken",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
