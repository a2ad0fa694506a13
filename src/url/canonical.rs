use crate::UrlError;
use std::fmt;
use url::Url;

/// A normalized crawl target: scheme, authority, path and query, no fragment
///
/// Two hrefs address the same crawl target iff their canonical forms are
/// field-wise equal. Ordering follows field order, which is what the report
/// uses for its sorted listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl {
    scheme: String,
    authority: String,
    path: String,
    query: Option<String>,
}

impl CanonicalUrl {
    /// Parses an absolute URL string into its canonical form
    ///
    /// # Errors
    ///
    /// Returns `UrlError::Parse` if the text is not an absolute URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use course_mirror::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("https://X.test/a/b;v=1?q=1#top").unwrap();
    /// assert_eq!(url.to_string(), "https://x.test/a/b?q=1");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
        Ok(Self::from_url(&url))
    }

    /// Builds the canonical form of an already parsed URL
    pub fn from_url(url: &Url) -> Self {
        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        Self {
            scheme: url.scheme().to_string(),
            authority,
            path: strip_params(url.path()).to_string(),
            query: url
                .query()
                .filter(|q| !q.is_empty())
                .map(|q| q.to_string()),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host plus an explicit non-default port, e.g. `example.com:8080`
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Converts back into a `url::Url` for the transport
    pub fn to_url(&self) -> Result<Url, UrlError> {
        Url::parse(&self.to_string()).map_err(|e| UrlError::Parse(e.to_string()))
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Opaque URLs (mailto:, javascript:) have neither authority nor a rooted path.
        if self.authority.is_empty() && !self.path.starts_with('/') {
            write!(f, "{}:{}", self.scheme, self.path)?;
        } else {
            write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// Canonicalizes an href found on the page `current`
///
/// # Rules
///
/// 1. Resolve the href against `current` (relative references inherit
///    scheme and authority, fragment-only references inherit the path)
/// 2. Drop the fragment
/// 3. Drop `;params` from the last path segment
/// 4. Keep the query, dropping an empty `?` artifact
///
/// Canonicalization never fails: text that cannot be resolved yields
/// `current` itself.
///
/// # Examples
///
/// ```
/// use course_mirror::url::{canonicalize, CanonicalUrl};
///
/// let current = CanonicalUrl::parse("https://x.test/a/b").unwrap();
/// assert_eq!(canonicalize("#section", &current), current);
/// assert_eq!(canonicalize("c", &current).to_string(), "https://x.test/a/c");
/// ```
pub fn canonicalize(raw_href: &str, current: &CanonicalUrl) -> CanonicalUrl {
    let base = match current.to_url() {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot use {} as a base URL: {}", current, e);
            return current.clone();
        }
    };

    match base.join(raw_href) {
        Ok(resolved) => CanonicalUrl::from_url(&resolved),
        Err(e) => {
            tracing::debug!("Unresolvable href {:?} on {}: {}", raw_href, current, e);
            current.clone()
        }
    }
}

/// Removes a `;params` suffix from the last segment of a path
fn strip_params(path: &str) -> &str {
    let leaf_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[leaf_start..].find(';') {
        Some(i) => &path[..leaf_start + i],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> CanonicalUrl {
        CanonicalUrl::parse("https://x.test/a/b").unwrap()
    }

    #[test]
    fn test_fragment_only_inherits_current_path() {
        let result = canonicalize("#section", &current());
        assert_eq!(result.to_string(), "https://x.test/a/b");
        assert_eq!(result, current());
    }

    #[test]
    fn test_empty_href_is_current_page() {
        assert_eq!(canonicalize("", &current()), current());
    }

    #[test]
    fn test_absolute_path_inherits_authority() {
        let result = canonicalize("/a/c", &current());
        assert_eq!(result.scheme(), "https");
        assert_eq!(result.authority(), "x.test");
        assert_eq!(result.path(), "/a/c");
    }

    #[test]
    fn test_relative_path_resolves_against_directory() {
        assert_eq!(canonicalize("c", &current()).to_string(), "https://x.test/a/c");
        assert_eq!(canonicalize("../d", &current()).to_string(), "https://x.test/d");
    }

    #[test]
    fn test_query_preserved_and_distinct() {
        let with_query = canonicalize("/a/b?lang=en", &current());
        let without = canonicalize("/a/b", &current());
        assert_eq!(with_query.query(), Some("lang=en"));
        assert_ne!(with_query, without);
    }

    #[test]
    fn test_empty_query_dropped() {
        let result = canonicalize("/a/b?", &current());
        assert_eq!(result.query(), None);
        assert_eq!(result, current());
    }

    #[test]
    fn test_params_dropped() {
        let result = canonicalize("/a/page;jsessionid=42?x=1#frag", &current());
        assert_eq!(result.to_string(), "https://x.test/a/page?x=1");
    }

    #[test]
    fn test_params_in_directory_segment_kept() {
        assert_eq!(strip_params("/a;v=1/b"), "/a;v=1/b");
        assert_eq!(strip_params("/a/b;v=1"), "/a/b");
        assert_eq!(strip_params("b;v"), "b");
    }

    #[test]
    fn test_other_host_kept() {
        let result = canonicalize("https://other.test/c", &current());
        assert_eq!(result.authority(), "other.test");
        assert_eq!(result.to_string(), "https://other.test/c");
    }

    #[test]
    fn test_port_kept_in_authority() {
        let base = CanonicalUrl::parse("http://127.0.0.1:8080/a/").unwrap();
        let result = canonicalize("/b", &base);
        assert_eq!(result.authority(), "127.0.0.1:8080");
        assert_eq!(result.to_string(), "http://127.0.0.1:8080/b");
    }

    #[test]
    fn test_opaque_scheme_round_trips() {
        let result = canonicalize("mailto:someone@x.test", &current());
        assert_eq!(result.scheme(), "mailto");
        assert_eq!(result.authority(), "");
        assert_eq!(result.to_string(), "mailto:someone@x.test");
    }

    #[test]
    fn test_unresolvable_href_falls_back_to_current() {
        let result = canonicalize("http://[::1", &current());
        assert_eq!(result, current());
    }

    #[test]
    fn test_idempotent() {
        let hrefs = [
            "",
            "#top",
            "/a/b?lang=en",
            "c/d.pdf",
            "../x;p=1",
            "https://Other.TEST:8443/p/?q=a%20b#f",
            "mailto:someone@x.test",
            "/with space/file name.html",
            "?only=query",
        ];

        for href in hrefs {
            let once = canonicalize(href, &current());
            let twice = canonicalize(&once.to_string(), &current());
            assert_eq!(once, twice, "canonicalization not idempotent for {:?}", href);
        }
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(matches!(
            CanonicalUrl::parse("/relative/only"),
            Err(UrlError::Parse(_))
        ));
    }

    #[test]
    fn test_ordering_is_field_wise() {
        let a = CanonicalUrl::parse("https://a.test/z").unwrap();
        let b = CanonicalUrl::parse("https://b.test/a").unwrap();
        let c = CanonicalUrl::parse("http://z.test/").unwrap();
        let mut urls = vec![b.clone(), a.clone(), c.clone()];
        urls.sort();
        assert_eq!(urls, vec![c, a, b]);
    }
}
