//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the session cookie attached
//! - Main-content and navigation link extraction
//! - Content classification (HTML page, PDF, other binary)
//! - Overall crawl coordination over the worklist

mod classifier;
mod coordinator;
mod fetcher;
mod parser;

pub use classifier::{classify, Classification, ContentKind};
pub use coordinator::{crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{PageStructure, ParsedPage};
