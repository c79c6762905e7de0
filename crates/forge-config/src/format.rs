//! Config document formats.
//!
//! Output is always canonical compact JSON. Input goes through one of the
//! readers in [`ConfigFormat`], picked from the file extension. The JSON
//! reader falls back to YAML, so hand-written YAML in `config.json` loads.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::store::{AUTHOR_KEY, AUTHOR_URL_KEY, LINKS_KEY, THEME_KEY};

/// Top-level keys emitted first, in this order.
const DOCUMENT_ORDER: &[&str] = &[THEME_KEY, LINKS_KEY];

/// Keys of the `theme` mapping emitted first, in this order.
const THEME_ORDER: &[&str] = &[AUTHOR_KEY, AUTHOR_URL_KEY];

/// Input format of a config document.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON, the format the store writes. Falls back to YAML on input.
    #[default]
    Json,
    /// YAML, accepted on input only.
    Yaml,
    /// TOML, accepted on input only.
    Toml,
}

impl ConfigFormat {
    /// Picks the reader for `path`: `.yml`/`.yaml` and `.toml` by
    /// extension, JSON for anything else.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// Parses `text` into a top-level mapping.
    ///
    /// No schema is enforced: any mapping is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is malformed or its root is not a mapping.
    /// For [`ConfigFormat::Json`], the JSON error is reported when the YAML
    /// fallback fails too.
    pub fn parse(self, text: &str) -> Result<Map<String, Value>> {
        let value: Value = match self {
            Self::Json => match serde_json::from_str(text) {
                Ok(value) => value,
                Err(json_err) => serde_yaml_ng::from_str(text)
                    .map_err(|_| json_err)
                    .context("invalid JSON document")?,
            },
            Self::Yaml => serde_yaml_ng::from_str(text).context("invalid YAML document")?,
            Self::Toml => toml::from_str(text).context("invalid TOML document")?,
        };
        match value {
            Value::Object(map) => Ok(map),
            other => bail!("config root must be a mapping, found {}", kind(&other)),
        }
    }
}

/// Writes `data` to `sink` as canonical JSON.
///
/// `theme` (with `author`, `author_url` leading) comes first, then `links`,
/// then any other key in insertion order. Compact, no trailing newline.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_canonical<W: Write + ?Sized>(data: &Map<String, Value>, sink: &mut W) -> Result<()> {
    serde_json::to_writer(&mut *sink, &canonical(data))
        .context("failed to serialize config to JSON")
}

/// Copy of `data` with the canonical key order.
fn canonical(data: &Map<String, Value>) -> Map<String, Value> {
    let mut out = reordered(data, DOCUMENT_ORDER);
    if let Some(Value::Object(theme)) = out.get_mut(THEME_KEY) {
        *theme = reordered(theme, THEME_ORDER);
    }
    out
}

/// Copy of `map` with the `leading` keys first, the rest in insertion order.
fn reordered(map: &Map<String, Value>, leading: &[&str]) -> Map<String, Value> {
    let head = leading
        .iter()
        .filter_map(|key| map.get_key_value(*key));
    let tail = map
        .iter()
        .filter(|(key, _)| !leading.contains(&key.as_str()));
    head.chain(tail)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
