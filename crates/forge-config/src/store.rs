//! `ConfigStore`: in-memory settings plus load-or-create persistence.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::{ConfigFormat, write_canonical};
use crate::paths::resolve_config_path;
use crate::storage::{FsStorage, Storage};

/// Top-level key of the theme mapping.
pub const THEME_KEY: &str = "theme";
/// Theme key holding the author name.
pub const AUTHOR_KEY: &str = "author";
/// Theme key holding the author URL.
pub const AUTHOR_URL_KEY: &str = "author_url";
/// Top-level key of the linked paths sequence.
pub const LINKS_KEY: &str = "links";

/// Typed view of the `theme` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme author name.
    pub author: Option<String>,
    /// Theme author homepage.
    pub author_url: Option<String>,
}

/// User configuration backed by `~/.forge/config.json`.
///
/// Holds a loosely typed mapping: `theme` and `links` are present after
/// construction, any other key set through [`ConfigStore::set`] is kept and
/// persisted. Nothing is validated, neither on `set` nor on [`ConfigStore::read`].
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct ConfigStore<S = FsStorage> {
    path: PathBuf,
    data: Map<String, Value>,
    storage: S,
}

impl ConfigStore<FsStorage> {
    /// Creates a store with default settings at `~/.forge/config.json`.
    ///
    /// No I/O is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = resolve_config_path()?;
        Ok(Self::with_path(path))
    }

    /// Creates a store with default settings backed by `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::with_storage(path, FsStorage)
    }
}

impl<S: Storage> ConfigStore<S> {
    /// Creates a store with default settings that reaches `path` through `storage`.
    #[must_use]
    pub fn with_storage(path: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            path: path.into(),
            data: default_data(),
            storage,
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole settings mapping.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the value under `key`, or `None` if it is not set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Mutable access to the value under `key`, for in-place nested edits.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Any value is accepted, including ones that do not match the
    /// built-in `theme`/`links` shape.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Reads `theme` as a [`Theme`]. A missing `theme` reads as the default.
    ///
    /// # Errors
    ///
    /// Returns an error if `theme` holds something other than a mapping of
    /// nullable strings.
    pub fn theme(&self) -> Result<Theme> {
        self.data.get(THEME_KEY).map_or_else(
            || Ok(Theme::default()),
            |value| Theme::deserialize(value).context("theme is not a mapping of strings"),
        )
    }

    /// Writes `author` and `author_url` into the `theme` mapping, creating it
    /// if absent. Other keys already in `theme` are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `theme` holds something other than a mapping.
    pub fn set_theme(&mut self, theme: &Theme) -> Result<()> {
        match self
            .data
            .entry(THEME_KEY)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => {
                map.insert(String::from(AUTHOR_KEY), Value::from(theme.author.clone()));
                map.insert(
                    String::from(AUTHOR_URL_KEY),
                    Value::from(theme.author_url.clone()),
                );
                Ok(())
            }
            _ => bail!("theme is not a mapping"),
        }
    }

    /// Reads `links` as a list of paths. A missing `links` reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `links` holds something other than a sequence of strings.
    pub fn links(&self) -> Result<Vec<String>> {
        self.data.get(LINKS_KEY).map_or_else(
            || Ok(Vec::new()),
            |value| Vec::<String>::deserialize(value).context("links is not a sequence of strings"),
        )
    }

    /// Replaces `links` with `links`.
    pub fn set_links(&mut self, links: Vec<String>) {
        self.data.insert(String::from(LINKS_KEY), Value::from(links));
    }

    /// Appends `link` to `links`, creating the sequence if it is absent.
    /// Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `links` holds something other than a sequence.
    pub fn add_link(&mut self, link: impl Into<String>) -> Result<()> {
        match self
            .data
            .entry(LINKS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => {
                items.push(Value::String(link.into()));
                Ok(())
            }
            _ => bail!("links is not a sequence"),
        }
    }

    /// Loads settings from the backing file, or creates it if missing.
    ///
    /// - File missing: writes the current settings via [`ConfigStore::write`]
    ///   and leaves them unchanged. The file is never opened for reading.
    /// - File present: replaces the settings wholesale with the parsed
    ///   document. Keys missing from the document stay missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if writing
    /// the initial file fails. Settings are left untouched on error.
    pub fn read(&mut self) -> Result<()> {
        if !self.storage.exists(&self.path) {
            tracing::debug!(path = %self.path.display(), "config file not found, creating it");
            return self.write();
        }

        let mut text = String::new();
        self.storage
            .open_read(&self.path)?
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        let data = ConfigFormat::from_path(&self.path)
            .parse(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), keys = data.len(), "config loaded");
        self.data = data;
        Ok(())
    }

    /// Writes the settings to the backing file, creating it and its parent
    /// directory if needed and overwriting any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write(&self) -> Result<()> {
        let mut sink = self.storage.open_write(&self.path)?;
        self.write_to(&mut sink)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "config written");
        Ok(())
    }

    /// Writes the settings as canonical JSON to `sink` instead of the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing to `sink` fails.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
        write_canonical(&self.data, sink)?;
        sink.flush().context("failed to flush config output")
    }
}

/// `{"theme":{"author":null,"author_url":null},"links":[]}`
fn default_data() -> Map<String, Value> {
    let mut theme = Map::new();
    theme.insert(String::from(AUTHOR_KEY), Value::Null);
    theme.insert(String::from(AUTHOR_URL_KEY), Value::Null);

    let mut data = Map::new();
    data.insert(String::from(THEME_KEY), Value::Object(theme));
    data.insert(String::from(LINKS_KEY), Value::Array(Vec::new()));
    data
}
