//! URL to local path mapping
//!
//! Maps a canonical URL to a file under the output root:
//! `{root}/{scheme}-{authority}/{decoded path}[_{query tag}]{suffix}`.

use crate::url::CanonicalUrl;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Leaf used for the root path and for paths ending in `/`
const INDEX_SEGMENT: &str = "index";

/// Number of hex digits of the query hash kept in file names
const QUERY_TAG_LEN: usize = 12;

/// Maps a canonical URL to its destination file under `root`
///
/// # Mapping Steps
///
/// 1. Percent-decode the path and replace spaces with underscores
/// 2. Split into segments, dropping the leading root and empty segments;
///    `.` is dropped and `..` becomes `__` so nothing escapes `root`
/// 3. A path ending in `/` (including the root itself) gets an `index` leaf
/// 4. A query string adds `_` plus a short SHA-256 tag to the leaf, before
///    its extension
/// 5. A leaf without an extension gets `fallback_suffix`
/// 6. Everything is placed under `{scheme}-{authority}` inside `root`
///
/// # Examples
///
/// ```
/// use course_mirror::output::map_to_path;
/// use course_mirror::url::CanonicalUrl;
/// use std::path::Path;
///
/// let url = CanonicalUrl::parse("https://x.test/a/My%20Notes").unwrap();
/// let path = map_to_path(Path::new("out"), &url, ".html");
/// assert_eq!(path, Path::new("out/https-x.test/a/My_Notes.html"));
/// ```
pub fn map_to_path(root: &Path, url: &CanonicalUrl, fallback_suffix: &str) -> PathBuf {
    let raw = urlencoding::decode_binary(url.path().as_bytes());
    let decoded = String::from_utf8_lossy(&raw).replace(' ', "_");

    let mut segments: Vec<String> = decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| {
            if segment == ".." {
                "__".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();

    if segments.is_empty() || decoded.ends_with('/') {
        segments.push(INDEX_SEGMENT.to_string());
    }

    if let Some(leaf) = segments.last_mut() {
        if let Some(query) = url.query() {
            *leaf = tag_with_query(leaf, query);
        }
        if !has_extension(leaf) {
            leaf.push_str(fallback_suffix);
        }
    }

    let mut path = root.join(format!("{}-{}", url.scheme(), url.authority()));
    for segment in segments {
        path.push(segment);
    }
    path
}

/// Returns true if the last dot in `leaf` separates a non-empty stem from a
/// non-empty extension
fn has_extension(leaf: &str) -> bool {
    match leaf.rfind('.') {
        Some(i) => i > 0 && i + 1 < leaf.len(),
        None => false,
    }
}

/// Inserts `_<hash of query>` into `leaf`, before its extension if it has one
fn tag_with_query(leaf: &str, query: &str) -> String {
    let digest = hex::encode(Sha256::digest(query.as_bytes()));
    let tag = &digest[..QUERY_TAG_LEN];

    if has_extension(leaf) {
        // has_extension guarantees a dot past the first byte
        let dot = leaf.rfind('.').unwrap_or(leaf.len());
        format!("{}_{}{}", &leaf[..dot], tag, &leaf[dot..])
    } else {
        format!("{}_{}", leaf, tag)
    }
}
