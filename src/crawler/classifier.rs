//! Content classification
//!
//! Decides once, from the Content-Type header, how a fetched body is
//! interpreted: HTML pages are reduced to their main-content region and
//! scanned for links, PDFs and everything else are stored verbatim.

use crate::crawler::parser::PageStructure;

/// Closed set of content kinds the crawler distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Html,
    Pdf,
    Binary,
}

impl ContentKind {
    /// Classifies a Content-Type header value; an absent header is treated
    /// as empty, which falls through to `Binary`
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let content_type = content_type.unwrap_or("").to_ascii_lowercase();
        if content_type.contains("text/html") {
            Self::Html
        } else if content_type.contains("application/pdf") {
            Self::Pdf
        } else {
            Self::Binary
        }
    }

    /// File suffix appended to extension-less output paths
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Html => ".html",
            Self::Pdf => ".pdf",
            Self::Binary => ".bin",
        }
    }
}

/// What to do with a classified resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Store `content` in the mirror
    Store {
        kind: ContentKind,
        content: Vec<u8>,
        links: Vec<String>,
    },

    /// HTML page without the main-content region: record as broken, store
    /// nothing, but still follow its navigation links
    Mismatch { links: Vec<String> },
}

impl Classification {
    /// Raw hrefs to fan out, in extraction order
    pub fn links(&self) -> &[String] {
        match self {
            Self::Store { links, .. } | Self::Mismatch { links } => links,
        }
    }
}

/// Classifies a fetched body according to its Content-Type
///
/// # Example
///
/// ```
/// use course_mirror::config::HtmlConfig;
/// use course_mirror::crawler::{classify, Classification, ContentKind, PageStructure};
///
/// let structure = PageStructure::new(&HtmlConfig::default()).unwrap();
/// let result = classify(Some("application/pdf"), b"%PDF-1.4".to_vec(), &structure);
/// assert!(matches!(result, Classification::Store { kind: ContentKind::Pdf, .. }));
/// ```
pub fn classify(
    content_type: Option<&str>,
    body: Vec<u8>,
    structure: &PageStructure,
) -> Classification {
    let kind = ContentKind::from_content_type(content_type);

    match kind {
        ContentKind::Html => {
            let html = String::from_utf8_lossy(&body);
            let parsed = structure.parse(&html);
            match parsed.standalone_document() {
                Some(document) => Classification::Store {
                    kind,
                    content: document.into_bytes(),
                    links: parsed.links,
                },
                None => Classification::Mismatch {
                    links: parsed.links,
                },
            }
        }
        ContentKind::Pdf | ContentKind::Binary => Classification::Store {
            kind,
            content: body,
            links: Vec::new(),
        },
    }
}
