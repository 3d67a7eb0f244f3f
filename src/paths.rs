//! XDG-style path resolution for sprout directories
//!
//! Generated scripts and rendered configs live under
//! `$XDG_CONFIG_HOME/sprout` (defaulting to `~/.config/sprout`) on every
//! platform.

use std::path::PathBuf;

/// XDG config home, defaulting to ~/.config.
pub fn xdg_config_home() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
}

/// Directory holding generated shell scripts and the entrypoint.
pub fn sprout_dir() -> PathBuf {
    xdg_config_home().join("sprout")
}

/// Default component catalog directory.
pub fn default_catalog_dir() -> PathBuf {
    sprout_dir().join("catalog")
}
