//! URL handling module for Course-Mirror
//!
//! This module provides href canonicalization and the scope-prefix matcher
//! that routes discovered links into the crawl or into the external list.

mod canonical;
mod scope;

// Re-export main types and functions
pub use canonical::{canonicalize, CanonicalUrl};
pub use scope::{in_scope, parse_prefixes, resolve_scope, ScopePrefix};

/// Where a discovered link is routed after canonicalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkRoute {
    /// Inside at least one scope prefix - eligible for crawling
    Crawl,
    /// Outside every scope prefix - recorded, never fetched
    External,
}

impl LinkRoute {
    /// Routes a canonical URL against the configured scope
    pub fn for_url(url: &CanonicalUrl, prefixes: &[ScopePrefix]) -> Self {
        if in_scope(url, prefixes) {
            Self::Crawl
        } else {
            Self::External
        }
    }
}
