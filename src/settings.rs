/*!
 * Settings file loading and filter normalization
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, SrcDumpError};
use crate::filter;

/// Top-level layout of the settings file
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    default_settings: Option<DefaultSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultSettings {
    source_extensions: Option<Vec<String>>,
    omit_dirs: Option<Vec<String>>,
}

/// Normalized, lower-cased filter sets for one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Suffixes beginning with '.'
    pub extensions: BTreeSet<String>,
    /// Exact file names
    pub filenames: BTreeSet<String>,
    /// Names and wildcard patterns to prune or skip
    pub omit_patterns: BTreeSet<String>,
}

impl FilterConfig {
    /// Build a filter from raw `source_extensions` and `omit_dirs` entries
    ///
    /// Entries starting with '.' become extensions, everything else an exact
    /// filename.
    pub fn from_entries<S, O>(sources: S, omit: O) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        let mut extensions = BTreeSet::new();
        let mut filenames = BTreeSet::new();
        for entry in sources {
            let entry = entry.as_ref().to_lowercase();
            if entry.starts_with('.') {
                extensions.insert(entry);
            } else {
                filenames.insert(entry);
            }
        }

        Self {
            extensions,
            filenames,
            omit_patterns: omit.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    /// Load and normalize a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        let parsed: Option<SettingsFile> = if content.trim().is_empty() {
            None
        } else {
            serde_yaml::from_str(&content).map_err(|source| SrcDumpError::Settings {
                path: path.display().to_string(),
                source,
            })?
        };

        let Some(defaults) = parsed.and_then(|s| s.default_settings) else {
            warn!(
                "Config file '{}' is empty or missing 'default_settings'. Using empty defaults.",
                path.display()
            );
            return Ok(Self::default());
        };

        let sources = defaults.source_extensions.unwrap_or_else(|| {
            warn!("Config file '{}' has no 'source_extensions'. Using an empty list.", path.display());
            Vec::new()
        });
        let omit = defaults.omit_dirs.unwrap_or_else(|| {
            warn!("Config file '{}' has no 'omit_dirs'. Using an empty list.", path.display());
            Vec::new()
        });

        Ok(Self::from_entries(sources, omit))
    }

    /// Return a copy extended with per-run additions
    ///
    /// Every extra include is treated as a suffix, so a bare file name given
    /// here also matches names ending with it.
    pub fn with_additions<I, O>(&self, extra_include: I, extra_omit: O) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        let mut merged = self.clone();
        merged
            .extensions
            .extend(extra_include.into_iter().map(|e| e.as_ref().to_lowercase()));
        merged
            .omit_patterns
            .extend(extra_omit.into_iter().map(|p| p.as_ref().to_lowercase()));
        merged
    }

    /// Whether a file name counts as source
    pub fn is_source_file(&self, name: &str) -> bool {
        filter::is_source_file(name, &self.extensions, &self.filenames)
    }

    /// Whether a directory must not be descended into
    pub fn should_prune_directory(&self, name: &str) -> bool {
        filter::should_prune_directory(name, &self.omit_patterns)
    }

    /// Whether a file must be left out even if it is a source file
    pub fn should_skip_file(&self, name: &str) -> bool {
        filter::should_skip_file(name, &self.omit_patterns)
    }
}

/// Remembers the last successfully loaded settings file
#[derive(Debug, Default)]
pub struct SettingsCache {
    last: Option<(String, FilterConfig)>,
}

impl SettingsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the filter for a settings file, falling back to an empty filter
    pub fn resolve(&mut self, path: &Path) -> FilterConfig {
        let key = resolved_key(path);
        if let Some((cached_key, filter)) = &self.last {
            if *cached_key == key {
                debug!("Reusing cached settings for {}", key);
                return filter.clone();
            }
        }

        match FilterConfig::load(path) {
            Ok(filter) => {
                self.last = Some((key, filter.clone()));
                filter
            }
            Err(SrcDumpError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file '{}' not found. Using empty defaults.", path.display());
                FilterConfig::default()
            }
            Err(e) => {
                warn!("{}. Using empty defaults.", e);
                FilterConfig::default()
            }
        }
    }

    /// Whether a settings file is currently cached
    #[cfg(test)]
    pub(crate) fn is_cached(&self, path: &Path) -> bool {
        let key = resolved_key(path);
        self.last.as_ref().is_some_and(|(k, _)| *k == key)
    }
}

fn resolved_key(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .display()
        .to_string()
}
