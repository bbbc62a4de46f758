//! Source registry and longest-prefix matching.
//!
//! A [`Registry`] is an immutable snapshot mapping path prefixes to
//! [`SourceConfig`]s. Prefixes are compared with their trailing slashes
//! removed, so `/images` and `/images/` route identically. The longest match
//! wins; equal-length matches go to the lexicographically smallest prefix.

use std::collections::BTreeMap;

use crate::config::SourceConfig;

/// The registered prefix that best matches a request path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixMatch<'a> {
    /// Prefix exactly as registered
    pub prefix: &'a str,
    /// Prefix with trailing slashes removed; this is what matched the path
    pub stripped: &'a str,
    pub config: &'a SourceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    sources: BTreeMap<String, SourceConfig>,
}

impl Registry {
    pub fn new(sources: BTreeMap<String, SourceConfig>) -> Self {
        Registry { sources }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, prefix: &str) -> Option<&SourceConfig> {
        self.sources.get(prefix)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Find the source whose prefix best matches an escaped request path.
    pub fn best_match(&self, escaped_path: &str) -> Option<PrefixMatch<'_>> {
        let mut best: Option<PrefixMatch<'_>> = None;

        // BTreeMap iterates in ascending key order, so keeping the first of
        // several equal-length matches picks the smallest prefix.
        for (prefix, config) in &self.sources {
            let stripped = prefix.trim_end_matches('/');
            if !escaped_path.starts_with(stripped) {
                continue;
            }
            let longer = best
                .as_ref()
                .map_or(true, |current| stripped.len() > current.stripped.len());
            if longer {
                best = Some(PrefixMatch {
                    prefix: prefix.as_str(),
                    stripped,
                    config,
                });
            }
        }

        best
    }
}

impl FromIterator<(String, SourceConfig)> for Registry {
    fn from_iter<I: IntoIterator<Item = (String, SourceConfig)>>(iter: I) -> Self {
        Registry::new(iter.into_iter().collect())
    }
}
