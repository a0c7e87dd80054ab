use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CrawlError, Result};

/// Leaderboard path appended to every target's base URL.
pub const ENDPOINT: &str = "api/leaderboard/top/";

/// A named leaderboard host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name:     String,
    pub base_url: String,
}

impl Target {
    pub fn page_url(&self, page: u64, count: u32) -> String { page_url(&self.base_url, page, count) }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} ({})", self.name, self.base_url) }
}

/// Builds the URL of one leaderboard page.
///
/// # Examples
///
/// ```
/// use ladder_crawl::page_url;
///
/// assert_eq!(
///     page_url("https://www.kogama.com/", 3, 400),
///     "https://www.kogama.com/api/leaderboard/top/?count=400&page=3"
/// );
/// ```
pub fn page_url(base_url: &str, page: u64, count: u32) -> String {
    format!("{}/{ENDPOINT}?count={count}&page={page}", base_url.trim_end_matches('/'))
}

/// Case-insensitive mapping from target names to base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegistry(BTreeMap<String, String>);

impl Default for TargetRegistry {
    fn default() -> Self { Self::builtin() }
}

impl TargetRegistry {
    pub fn empty() -> Self { Self(BTreeMap::new()) }

    /// The three public leaderboard hosts.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert("www", "https://www.kogama.com/");
        registry.insert("br", "https://www.kogama.com.br/");
        registry.insert("friends", "https://friends.kogama.com/");
        registry
    }

    /// Adds or replaces a target. Names are stored lowercased.
    pub fn insert(&mut self, name: impl AsRef<str>, base_url: impl Into<String>) {
        self.0.insert(normalize(name.as_ref()), base_url.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn resolve(&self, name: &str) -> Result<Target> {
        let key = normalize(name);
        let Some(base_url) = self.0.get(&key) else {
            return Err(CrawlError::UnknownTarget {
                name:  name.trim().to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            });
        };

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(CrawlError::InvalidTarget {
                name: key,
                url:  base_url.clone(),
            });
        }

        Ok(Target {
            name:     key,
            base_url: base_url.clone(),
        })
    }
}

impl<N: AsRef<str>, U: Into<String>> Extend<(N, U)> for TargetRegistry {
    fn extend<I: IntoIterator<Item = (N, U)>>(&mut self, iter: I) {
        for (name, base_url) in iter {
            self.insert(name, base_url);
        }
    }
}

fn normalize(name: &str) -> String { name.trim().to_lowercase() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_targets() {
        let registry = TargetRegistry::builtin();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["br", "friends", "www"]);
        assert_eq!(registry.resolve("br").unwrap().base_url, "https://www.kogama.com.br/");
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_trimmed() {
        let registry = TargetRegistry::builtin();
        let target = registry.resolve("  WWW ").unwrap();
        assert_eq!(target.name, "www");
        assert_eq!(target.base_url, "https://www.kogama.com/");
    }

    #[test]
    fn test_unknown_target() {
        let err = TargetRegistry::builtin().resolve("moon").unwrap_err();
        match err {
            CrawlError::UnknownTarget { name, known } => {
                assert_eq!(name, "moon");
                assert_eq!(known, "br, friends, www");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let mut registry = TargetRegistry::empty();
        registry.insert("local", "ftp://localhost/");
        assert!(matches!(registry.resolve("local"), Err(CrawlError::InvalidTarget { .. })));
    }

    #[test]
    fn test_extend_overrides_and_adds() {
        let mut registry = TargetRegistry::builtin();
        registry.extend([("WWW", "http://127.0.0.1:8080"), ("staging", "https://staging.example/")]);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve("www").unwrap().base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_page_url_joins_without_double_slash() {
        let target = Target {
            name:     "local".into(),
            base_url: "http://127.0.0.1:8080".into(),
        };
        assert_eq!(
            target.page_url(1, 50),
            "http://127.0.0.1:8080/api/leaderboard/top/?count=50&page=1"
        );
    }
}
