//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: The state of an individual claimed page (fetching, visited, broken, failed)
//! - `CrawlState`: The single record holding every accumulator of a crawl run

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, PathCollision, VisitedEntry};
pub use page_state::PageState;
