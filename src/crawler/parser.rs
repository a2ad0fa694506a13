//! HTML structure parser
//!
//! Locates the two regions of a documentation page that the crawler trusts:
//! the main-content region (what gets stored) and the navigation region
//! (a secondary source of links). Anchors anywhere else are ignored.

use crate::config::HtmlConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Outer HTML of the main-content region, if the page has one
    pub main_content: Option<String>,

    /// Raw href values from the navigation region, then the main-content
    /// region, in document order
    pub links: Vec<String>,
}

impl ParsedPage {
    /// Wraps the main-content region into a minimal standalone document
    pub fn standalone_document(&self) -> Option<String> {
        self.main_content
            .as_ref()
            .map(|content| format!("<html><body>{}</body></html>", content))
    }
}

/// Compiled selectors for the page regions
#[derive(Debug, Clone)]
pub struct PageStructure {
    main: Selector,
    nav: Selector,
    anchor: Selector,
}

impl PageStructure {
    /// Compiles the configured region selectors
    pub fn new(config: &HtmlConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            main: compile(&config.main_selector)?,
            nav: compile(&config.nav_selector)?,
            anchor: compile("a[href]")?,
        })
    }

    /// Parses a document and extracts its regions and links
    ///
    /// # Example
    ///
    /// ```
    /// use course_mirror::config::HtmlConfig;
    /// use course_mirror::crawler::PageStructure;
    ///
    /// let structure = PageStructure::new(&HtmlConfig::default()).unwrap();
    /// let html = r#"<nav class="sidebar"><a href="/a">A</a></nav>
    ///               <article class="content"><a href="/b">B</a></article>
    ///               <footer><a href="/c">C</a></footer>"#;
    /// let parsed = structure.parse(html);
    /// assert_eq!(parsed.links, vec!["/a", "/b"]);
    /// ```
    pub fn parse(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);

        let main = document.select(&self.main).next();
        let nav = document.select(&self.nav).next();

        let mut links = Vec::new();
        for region in [nav, main].into_iter().flatten() {
            links.extend(self.anchors(region));
        }

        ParsedPage {
            main_content: main.map(|element| element.html()),
            links,
        }
    }

    /// Non-empty href values of the anchors inside `region`
    fn anchors<'a>(&'a self, region: ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
        region
            .select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
