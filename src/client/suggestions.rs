// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise-name suggestion cache for autocomplete.
//!
//! Names are kept in a local JSON file (an array of strings). The cache is
//! a convenience only: load and save failures are logged and otherwise
//! ignored.

use std::path::{Path, PathBuf};

/// Deduplicated list of exercise names, in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct NameSuggestions {
    path: Option<PathBuf>,
    names: Vec<String>,
}

impl NameSuggestions {
    /// Cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache from `path`. A missing or unreadable file yields an
    /// empty cache that will be written back to `path` on the next change.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let names = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt name cache");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read name cache");
                Vec::new()
            }
        };

        let mut cache = Self {
            path: Some(path),
            names: Vec::with_capacity(names.len()),
        };
        for name in names {
            cache.push_unique(&name);
        }
        cache
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add one name. Returns `true` if it was new.
    pub fn insert(&mut self, name: &str) -> bool {
        let added = self.push_unique(name);
        if added {
            self.save();
        }
        added
    }

    /// Add several names, writing the file at most once. Returns how many
    /// were new.
    pub fn merge<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = names
            .into_iter()
            .filter(|name| self.push_unique(name.as_ref()))
            .count();
        if added > 0 {
            self.save();
        }
        added
    }

    /// Names matching `query`, case-insensitively: prefix matches first,
    /// then other substring matches. An empty query returns every name.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.names.iter().take(limit).map(String::as_str).collect();
        }

        let (mut prefix, substring): (Vec<&str>, Vec<&str>) = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|name| name.to_lowercase().contains(&query))
            .partition(|name| name.to_lowercase().starts_with(&query));

        prefix.extend(substring);
        prefix.truncate(limit);
        prefix
    }

    fn push_unique(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.names.iter().any(|n| n == name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Best-effort write of the cache file.
    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let result = serde_json::to_string(&self.names)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save name cache");
        }
    }
}
