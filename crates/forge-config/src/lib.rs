//! Persistent user configuration for forge.
//!
//! A small nested settings document (theme author metadata and a list of
//! linked paths) kept in `~/.forge/config.json`. [`ConfigStore::read`] loads
//! it, writing defaults on first run; [`ConfigStore::write`] saves it as
//! compact JSON.

/// Input readers and the canonical JSON writer.
mod format;
/// Config path resolution.
mod paths;
/// Filesystem access seam.
mod storage;
mod store;

pub use format::ConfigFormat;
pub use paths::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, config_path_in, resolve_config_path};
pub use serde_json::{Map, Value};
pub use storage::{FsStorage, Storage};
pub use store::{AUTHOR_KEY, AUTHOR_URL_KEY, ConfigStore, LINKS_KEY, THEME_KEY, Theme};
