use crate::url::CanonicalUrl;
use crate::UrlError;
use std::fmt;
use url::Url;

/// A crawl boundary: scheme, authority and a path prefix
///
/// The path prefix is compared as a plain string prefix, so `/course`
/// also admits `/course-info`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopePrefix {
    scheme: String,
    authority: String,
    path_prefix: String,
}

impl ScopePrefix {
    /// Parses a prefix URL, discarding its query and fragment
    ///
    /// # Examples
    ///
    /// ```
    /// use course_mirror::url::ScopePrefix;
    ///
    /// let prefix = ScopePrefix::parse("https://x.test/course?x=1#y").unwrap();
    /// assert_eq!(prefix.path_prefix(), "/course");
    /// ```
    pub fn parse(prefix: &str) -> Result<Self, UrlError> {
        let url = Url::parse(prefix.trim())
            .map_err(|e| UrlError::Parse(format!("{}: {}", prefix, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UrlError::InvalidScheme(prefix.to_string()));
        }
        if url.host_str().is_none() {
            return Err(UrlError::MissingHost(prefix.to_string()));
        }

        let canonical = CanonicalUrl::from_url(&url);
        Ok(Self {
            scheme: canonical.scheme().to_string(),
            authority: canonical.authority().to_string(),
            path_prefix: canonical.path().to_string(),
        })
    }

    /// The whole host of `start`: same scheme and authority, empty path prefix
    pub fn host_of(start: &CanonicalUrl) -> Self {
        Self {
            scheme: start.scheme().to_string(),
            authority: start.authority().to_string(),
            path_prefix: String::new(),
        }
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Returns true if `url` falls inside this prefix
    pub fn matches(&self, url: &CanonicalUrl) -> bool {
        url.scheme() == self.scheme
            && url.authority() == self.authority
            && url.path().starts_with(&self.path_prefix)
    }
}

impl fmt::Display for ScopePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path_prefix)
    }
}

/// Returns true if `url` matches at least one of `prefixes`
///
/// # Examples
///
/// ```
/// use course_mirror::url::{in_scope, CanonicalUrl, ScopePrefix};
///
/// let prefixes = vec![ScopePrefix::parse("https://x.test/course").unwrap()];
/// let url = CanonicalUrl::parse("https://x.test/course-info/a").unwrap();
/// assert!(in_scope(&url, &prefixes));
/// ```
pub fn in_scope(url: &CanonicalUrl, prefixes: &[ScopePrefix]) -> bool {
    prefixes.iter().any(|prefix| prefix.matches(url))
}

/// Parses a comma-separated list of scope prefixes
///
/// Surrounding whitespace is trimmed and empty items are skipped.
pub fn parse_prefixes(list: &str) -> Result<Vec<ScopePrefix>, UrlError> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ScopePrefix::parse)
        .collect()
}

/// Resolves the configured prefixes, defaulting to the whole host of `start`
pub fn resolve_scope(
    start: &CanonicalUrl,
    prefixes: &[String],
) -> Result<Vec<ScopePrefix>, UrlError> {
    let mut resolved = Vec::new();
    for entry in prefixes {
        for prefix in parse_prefixes(entry)? {
            if !resolved.contains(&prefix) {
                resolved.push(prefix);
            }
        }
    }

    if resolved.is_empty() {
        resolved.push(ScopePrefix::host_of(start));
    }
    Ok(resolved)
}
