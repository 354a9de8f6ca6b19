//! URL pattern compilation.
//!
//! Parses pattern strings like `/users/:id/posts` into an ordered list of
//! segment descriptors once, at rule-construction time.

use std::collections::HashMap;
use thiserror::Error;

/// Path parameters extracted from a capture-bearing pattern match.
pub type PathParams = HashMap<String, String>;

/// Error raised while compiling a URL pattern.
///
/// Compilation is the only place these surface; matching a compiled pattern
/// never fails, it only declines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern string was empty.
    #[error("pattern cannot be empty")]
    Empty,

    /// A capture segment had no name (a bare `:`).
    #[error("capture segment has an empty name")]
    EmptyCaptureName,

    /// The same capture name appeared twice in one pattern.
    #[error("duplicate capture name: {0}")]
    DuplicateCapture(String),
}

/// A single pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Matches any single segment and records it under the given name.
    Capture(String),
}

/// A compiled URL pattern.
///
/// Immutable after construction. Only the path portion of a URL participates
/// in matching: any scheme/host prefix and anything from `?` or `#` onward
/// is stripped before segmentation, so query-parameter ordering can never
/// affect match results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Compile a pattern string.
    ///
    /// Segments starting with `:` become named captures; all others are
    /// literals. Leading/trailing slashes are ignored, so `/hello`,
    /// `hello/` and `hello` compile identically.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut segments = Vec::new();
        for part in split_path(path_of(pattern)) {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyCaptureName);
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Capture(n) if n == name))
                {
                    return Err(PatternError::DuplicateCapture(name.to_string()));
                }
                segments.push(Segment::Capture(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of path segments this pattern expects.
    ///
    /// Used as a fast rejection test before per-segment comparison.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a request path against this pattern.
    ///
    /// Returns the extracted parameters on success. Segment counts must be
    /// exactly equal; there are no multi-segment wildcards or optional
    /// segments. Captured values are the raw segment text, no
    /// percent-decoding is applied.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        Some(params)
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extract the path portion of a URL or pattern string.
///
/// Strips a `scheme://host` prefix if present and cuts at the first `?` or
/// `#`. Pattern strings and request URLs go through the same reduction so
/// both sides segment identically.
pub(crate) fn path_of(url: &str) -> &str {
    let after_host = match url.find("://") {
        Some(idx) => {
            let rest = &url[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        None => url,
    };

    let end = after_host
        .find(['?', '#'])
        .unwrap_or(after_host.len());
    &after_host[..end]
}

/// Split a path on `/`, discarding empty segments from leading/trailing
/// slashes.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_literals_and_captures() {
        let pattern = UrlPattern::compile("/users/:id/posts").unwrap();
        assert_eq!(pattern.segment_count(), 3);
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".to_string()),
                Segment::Capture("id".to_string()),
                Segment::Literal("posts".to_string()),
            ]
        );
    }

    #[test]
    fn test_compile_empty_pattern() {
        assert_eq!(UrlPattern::compile(""), Err(PatternError::Empty));
    }

    #[test]
    fn test_compile_empty_capture_name() {
        assert_eq!(
            UrlPattern::compile("/users/:"),
            Err(PatternError::EmptyCaptureName)
        );
    }

    #[test]
    fn test_compile_duplicate_capture() {
        assert_eq!(
            UrlPattern::compile("/:id/child/:id"),
            Err(PatternError::DuplicateCapture("id".to_string()))
        );
    }

    #[test]
    fn test_slashes_do_not_change_shape() {
        let bare = UrlPattern::compile("users/:id").unwrap();
        let slashed = UrlPattern::compile("/users/:id/").unwrap();
        assert_eq!(bare.segments(), slashed.segments());
    }

    #[test]
    fn test_compile_strips_scheme_host_and_query() {
        let pattern = UrlPattern::compile("http://example.com/users/:id?sort=asc").unwrap();
        assert_eq!(pattern.segment_count(), 2);
        assert_eq!(
            pattern.segments()[0],
            Segment::Literal("users".to_string())
        );
    }

    #[test]
    fn test_match_extracts_params() {
        let pattern = UrlPattern::compile("/users/:id").unwrap();
        let params = pattern.match_path("/users/42").unwrap();
        assert_eq!(params.get("id"), Some(&"42".to_string()));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_match_rejects_segment_count_mismatch() {
        let pattern = UrlPattern::compile("/users/:id").unwrap();
        assert!(pattern.match_path("/users/42/edit").is_none());
        assert!(pattern.match_path("/users").is_none());
    }

    #[test]
    fn test_match_literal_is_case_sensitive() {
        let pattern = UrlPattern::compile("/Users/:id").unwrap();
        assert!(pattern.match_path("/users/42").is_none());
        assert!(pattern.match_path("/Users/42").is_some());
    }

    #[test]
    fn test_empty_path_matches_only_zero_segments() {
        let root = UrlPattern::compile("/").unwrap();
        assert_eq!(root.segment_count(), 0);
        assert!(root.match_path("").is_some());
        assert!(root.match_path("/").is_some());

        let deep = UrlPattern::compile("/users").unwrap();
        assert!(deep.match_path("").is_none());
    }

    #[test]
    fn test_captured_values_are_raw() {
        let pattern = UrlPattern::compile("/files/:name").unwrap();
        let params = pattern.match_path("/files/a%20b").unwrap();
        assert_eq!(params.get("name"), Some(&"a%20b".to_string()));
    }

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("http://example.com/a/b?x=1"), "/a/b");
        assert_eq!(path_of("https://example.com"), "");
        assert_eq!(path_of("/a/b#frag"), "/a/b");
        assert_eq!(path_of("/a/b"), "/a/b");
    }
}
