//! XDG Base Directory paths for pera.
//!
//! Vendor scanner libraries and scanner configuration live under XDG paths on
//! every platform, including Android shells where `$HOME` points into app
//! storage.

use std::path::PathBuf;

/// Get the pera config directory.
///
/// Returns `$XDG_CONFIG_HOME/pera` if set, otherwise `~/.config/pera`.
/// This is where `scanners.toml` and installed vendor libraries are kept.
///
/// # Examples
///
/// ```
/// use pera_paths::config_dir;
///
/// let config = config_dir();
/// let scanners = config.join("scanners");
/// ```
pub fn config_dir() -> PathBuf {
    if let Some(xdg_config) = non_empty_env("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("pera")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/pera")
    } else {
        PathBuf::from(".config/pera")
    }
}

/// Directory searched for vendor scanner libraries.
///
/// Each package gets its own subdirectory: `<config_dir>/scanners/<package>/`.
pub fn scanner_dir() -> PathBuf {
    config_dir().join("scanners")
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
