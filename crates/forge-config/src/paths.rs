//! Config path resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Directory under the user's home that holds forge state.
pub const CONFIG_DIR_NAME: &str = ".forge";

/// File name of the config document inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Resolves the config file path, `~/.forge/config.json`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or is not
/// an absolute path.
pub fn resolve_config_path() -> Result<PathBuf> {
    let home = home_dir()?;
    Ok(config_path_in(&home))
}

/// Returns the config file path below `home`.
#[must_use]
pub fn config_path_in(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// `HOME` first, `USERPROFILE` on platforms that only set that one.
fn home_dir() -> Result<PathBuf> {
    home_from(std::env::var_os("HOME"), std::env::var_os("USERPROFILE"))
}

fn home_from(home: Option<OsString>, user_profile: Option<OsString>) -> Result<PathBuf> {
    let dir = home
        .filter(|v| !v.is_empty())
        .or_else(|| user_profile.filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .context("neither HOME nor USERPROFILE environment variable is set")?;
    if !dir.is_absolute() {
        bail!("home directory {} is not an absolute path", dir.display());
    }
    Ok(dir)
}
