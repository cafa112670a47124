//! Paths that skip authentication.
//!
//! Patterns are compared segment by segment. A `**` segment matches any number
//! (including zero) of path segments; every other segment is literal. Empty
//! segments (leading, trailing or doubled slashes) are ignored on both sides.

pub const DEFAULT_PUBLIC_PATTERNS: [&str; 4] =
    ["/api/**", "/user/login", "/user/signup", "/health"];

const ANY_SEGMENTS: &str = "**";

#[derive(Debug, Clone)]
pub struct PublicRouteMatcher {
    patterns: Vec<Vec<String>>,
}

impl Default for PublicRouteMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PATTERNS)
    }
}

impl PublicRouteMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| segments(p.as_ref()).map(str::to_string).collect())
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = segments(path).collect();
        self.patterns
            .iter()
            .any(|pattern| match_segments(pattern, &path))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[String], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((head, rest)) if head == ANY_SEGMENTS => {
            // let `**` swallow 0..=n segments
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((head, rest)) => match path.split_first() {
            Some((segment, tail)) if head.as_str() == *segment => match_segments(rest, tail),
            _ => false,
        },
    }
}
