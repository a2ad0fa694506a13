//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the [`CrawlState`] and is its only writer. Fetches run
//! as tokio tasks; everything that touches the state (claiming, classifying,
//! path mapping, link fan-out) happens here when a task completes.
//!
//! A URL is claimed before its fetch is spawned, so no canonical URL is ever
//! fetched twice no matter how many pages link to it or how many fetches are
//! in flight.

use crate::config::Config;
use crate::crawler::classifier::{classify, Classification};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::parser::PageStructure;
use crate::output::map_to_path;
use crate::state::CrawlState;
use crate::url::{canonicalize, resolve_scope, CanonicalUrl, LinkRoute, ScopePrefix};
use crate::MirrorError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    structure: PageStructure,
    scope: Vec<ScopePrefix>,
    output_root: PathBuf,
    max_concurrent_requests: usize,
    max_pages: Option<usize>,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, resolves the scope (the start URL's host
    /// when no prefixes are configured) and builds the HTTP client.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, with the start URL pending
    /// * `Err(MirrorError)` - Invalid configuration or client setup failure
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        config.validate()?;

        let start = CanonicalUrl::parse(&config.scope.start)?;
        let scope = resolve_scope(&start, &config.scope.prefixes)?;
        let structure = PageStructure::new(&config.html)?;
        let client = build_http_client(&config.crawler)?;

        for prefix in &scope {
            tracing::debug!("Scope prefix: {}", prefix);
        }

        Ok(Self {
            client,
            structure,
            scope,
            output_root: PathBuf::from(&config.output.directory),
            max_concurrent_requests: config.crawler.max_concurrent_requests,
            max_pages: config.crawler.max_pages,
            state: CrawlState::new(start),
        })
    }

    /// The resolved crawl boundary
    pub fn scope(&self) -> &[ScopePrefix] {
        &self.scope
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Consumes the coordinator, returning the final crawl state
    pub fn into_state(self) -> CrawlState {
        self.state
    }

    /// Runs the crawl until the worklist is exhausted
    ///
    /// This loop:
    /// 1. Claims URLs from the worklist while fetch slots are free
    /// 2. Spawns a fetch task per claimed URL
    /// 3. Processes completed fetches (classify, store, fan out links)
    /// 4. Stops once nothing is pending or in flight
    ///
    /// Per-URL failures are recorded in the state and never end the crawl.
    pub async fn run(&mut self) -> Result<(), MirrorError> {
        tracing::info!(
            "Starting crawl with {} scope prefix(es), up to {} concurrent requests",
            self.scope.len(),
            self.max_concurrent_requests
        );

        let mut in_flight: JoinSet<(CanonicalUrl, FetchResult)> = JoinSet::new();
        let mut dispatched = 0usize;
        let mut completed = 0usize;
        let start_time = Instant::now();

        loop {
            while in_flight.len() < self.max_concurrent_requests && !self.budget_exhausted(dispatched)
            {
                let Some(url) = self.state.claim_next() else {
                    break;
                };

                tracing::debug!("Fetching {}", url);
                let client = self.client.clone();
                let request_url = url.to_string();
                in_flight.spawn(async move {
                    let result = fetch_url(&client, &request_url).await;
                    (url, result)
                });
                dispatched += 1;
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((url, result)) => self.process_result(url, result),
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
            completed += 1;

            if completed % 10 == 0 {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages done, {} pending, {} in flight, {:.2} pages/sec",
                    completed,
                    self.state.pending_len(),
                    in_flight.len(),
                    rate
                );
            }
        }

        if let Some(max) = self.max_pages.filter(|_| self.state.pending_len() > 0) {
            tracing::warn!(
                "Crawl budget of {} pages reached; up to {} URLs left pending",
                max,
                self.state.pending_len()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages fetched in {:?}",
            completed,
            start_time.elapsed()
        );

        Ok(())
    }

    fn budget_exhausted(&self, dispatched: usize) -> bool {
        self.max_pages.map_or(false, |max| dispatched >= max)
    }

    /// Handles one completed fetch
    fn process_result(&mut self, url: CanonicalUrl, result: FetchResult) {
        let (final_url, content_type, body) = match result {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::trace!("{} answered {}", url, status_code);
                (final_url, content_type, body)
            }
            failure => {
                let reason = failure.failure_reason().unwrap_or_default();
                tracing::warn!("Failed to fetch {}: {}", url, reason);
                self.state.record_failed(url, reason);
                return;
            }
        };

        if final_url != url.to_string() {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let links = match classify(content_type.as_deref(), body, &self.structure) {
            Classification::Store {
                kind,
                content,
                links,
            } => {
                let path = map_to_path(&self.output_root, &url, kind.suffix());
                tracing::info!(
                    "Downloaded {} ({:?}, {} bytes, {} links)",
                    url,
                    kind,
                    content.len(),
                    links.len()
                );
                self.state.record_visited(url.clone(), path, content);
                links
            }
            Classification::Mismatch { links } => {
                tracing::warn!("{} does not contain the expected HTML structure", url);
                self.state.record_broken(url.clone());
                links
            }
        };

        self.handle_discovered_links(&url, &links);
    }

    /// Canonicalizes and routes every link found on `current`
    fn handle_discovered_links(&mut self, current: &CanonicalUrl, links: &[String]) {
        for href in links {
            let target = canonicalize(href, current);
            let route = LinkRoute::for_url(&target, &self.scope);
            tracing::trace!("{} -> {} ({:?})", current, target, route);
            self.state.record_link(target, route);
        }
    }
}

/// Runs a crawl and writes its report and mirror
///
/// # Example
///
/// ```no_run
/// use course_mirror::config::Config;
/// use course_mirror::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = crawl(Config::for_start("https://courses.example.edu/2024/")).await?;
/// println!("Downloaded {} pages", stats.downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<crate::output::CrawlStatistics, MirrorError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await?;

    let root = coordinator.output_root().to_path_buf();
    let state = coordinator.into_state();
    crate::output::export_results(&state, &root)
}
