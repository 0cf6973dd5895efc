//! Ordered `KEY=VALUE` environment files
//!
//! [`EnvFile`] keeps entries in file order, so untouched variables stay where
//! they were. Values are taken literally: no escapes are processed and no
//! `$VAR` interpolation happens. The only quoting is an extra pair around a
//! value that is itself wrapped in quotes, so it reads back unchanged. Persisting goes through a
//! temporary file in the target directory that is renamed into place, so
//! readers see either the old file or the new one.

mod error;
mod persist;

pub use error::{EnvFileError, Result};

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, warn};

/// An ordered mapping of environment variable names to values
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: IndexMap<String, String>,
    /// Raw text this file was parsed from, if it was loaded from disk
    source: Option<String>,
}

impl EnvFile {
    /// Create an empty env file
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse env-file text.
    ///
    /// Parsing never fails. Blank lines and `#` comments are skipped, a
    /// leading `export ` is dropped and one matching pair of surrounding
    /// quotes is removed from the value. Malformed lines are logged and
    /// skipped. A repeated key keeps its first position and its last value.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut entries = IndexMap::new();

        for (index, line) in contents.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let assignment = trimmed.strip_prefix("export ").unwrap_or(trimmed);

            let Some((key, value)) = assignment.split_once('=') else {
                warn!(line = index + 1, "Skipping env file line without '='");
                continue;
            };
            let key = key.trim();
            if let Err(reason) = validate_key(key) {
                warn!(line = index + 1, reason, "Skipping env file line with invalid key");
                continue;
            }

            entries.insert(key.to_string(), unquote(value).to_string());
        }

        Self {
            entries,
            source: Some(contents.to_string()),
        }
    }

    /// Load and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFileError::Io`] if the file cannot be read. Use
    /// [`EnvFileError::is_not_found`] to tell a missing file apart.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| EnvFileError::io(e, path, "read"))?;
        let file = Self::parse(&contents);
        debug!(path = %path.display(), entries = file.len(), "Loaded env file");
        Ok(file)
    }

    /// Set `key` to `value`, returning the previous value.
    ///
    /// Existing keys keep their position; new keys are appended.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFileError::InvalidEntry`] if the pair cannot be written
    /// as one `KEY=VALUE` line. The file is left unchanged in that case.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let key = key.into();
        let value = value.into();

        if let Err(reason) = validate_key(&key) {
            return Err(EnvFileError::InvalidEntry { key, reason });
        }
        if value.contains(['\n', '\r', '\0']) {
            return Err(EnvFileError::InvalidEntry {
                key,
                reason: "value contains a line break or NUL byte",
            });
        }

        Ok(self.entries.insert(key, value))
    }

    /// Get the value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over variable names in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as text, one `KEY=VALUE` line per entry.
    ///
    /// [`EnvFile::parse`] of the result gives back the same entries.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            // Parsing strips one pair, so a quoted value needs another
            if let Some(quote) = surrounding_quote(value) {
                out.push(quote);
                out.push_str(value);
                out.push(quote);
            } else {
                out.push_str(value);
            }
            out.push('\n');
        }
        out
    }

    /// Whether rendering now would reproduce the loaded text byte for byte.
    ///
    /// Always `false` for a file that was not loaded from text.
    #[must_use]
    pub fn matches_source(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| source == self.render())
    }
}

impl std::fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values are usually secrets
        f.debug_struct("EnvFile")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> std::result::Result<(), &'static str> {
    if key.is_empty() {
        return Err("key is empty");
    }
    if key.starts_with('#') {
        return Err("key would be read as a comment");
    }
    if key.contains('=') {
        return Err("key contains '='");
    }
    if key.chars().any(|c| c.is_whitespace() || c == '\0') {
        return Err("key contains whitespace or a NUL byte");
    }
    Ok(())
}

fn surrounding_quote(value: &str) -> Option<char> {
    ['"', '\'']
        .into_iter()
        .find(|&quote| value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote))
}

fn unquote(value: &str) -> &str {
    match surrounding_quote(value) {
        Some(_) => &value[1..value.len() - 1],
        None => value,
    }
}
