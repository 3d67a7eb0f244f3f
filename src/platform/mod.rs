//! Host platform detection
//!
//! Detects the operating system, CPU architecture, Linux distribution and
//! the preferred system package manager. Detection never fails: unknown
//! values are left empty and callers fall back to less specific behavior.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// The detected host platform.
///
/// Immutable once detected for a process run. The resolver uses
/// [`Platform::method_lookup_keys`] to pick the most specific install
/// method declared for a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// Operating system: "linux", "macos", "windows"
    pub os: String,

    /// CPU architecture: "x86_64", "aarch64"
    pub arch: String,

    /// Linux distribution id from /etc/os-release (e.g. "ubuntu"), empty elsewhere
    #[serde(skip_serializing_if = "String::is_empty")]
    pub distro: String,

    /// Distribution family (e.g. "debian", "rhel", "arch"), empty when unknown
    #[serde(skip_serializing_if = "String::is_empty")]
    pub distro_family: String,

    /// Preferred system package manager binary (e.g. "brew", "apt"), empty when none found
    #[serde(skip_serializing_if = "String::is_empty")]
    pub package_manager: String,
}

/// Package managers probed on Linux, in order of preference.
const LINUX_PACKAGE_MANAGERS: &[&str] = &["apt", "dnf", "yum", "pacman", "zypper", "brew"];

impl Platform {
    /// Detect the current platform.
    ///
    /// Reads /etc/os-release and probes PATH for package manager binaries.
    /// Best-effort: missing information yields empty fields, never an error.
    pub fn detect() -> Self {
        let mut platform = Platform {
            os: normalize_os(std::env::consts::OS),
            arch: std::env::consts::ARCH.to_string(),
            ..Platform::default()
        };

        match platform.os.as_str() {
            "darwin" => platform.package_manager = "brew".to_string(),
            "linux" => platform.detect_linux(),
            "windows" => platform.package_manager = "winget".to_string(),
            _ => {}
        }

        platform
    }

    fn detect_linux(&mut self) {
        if let Ok(content) = std::fs::read_to_string("/etc/os-release") {
            self.parse_os_release(&content);
        }

        self.package_manager = LINUX_PACKAGE_MANAGERS
            .iter()
            .find(|mgr| command_exists(mgr))
            .map(|mgr| (*mgr).to_string())
            .unwrap_or_default();
    }

    /// Parse ID and ID_LIKE from /etc/os-release content.
    fn parse_os_release(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("ID=") {
                self.distro = value.trim_matches('"').to_string();
            }
            if let Some(value) = line.strip_prefix("ID_LIKE=") {
                let value = value.trim_matches('"');
                // ID_LIKE may list several families ("debian ubuntu"); take the first
                self.distro_family = value
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
            }
        }

        if self.distro_family.is_empty() {
            self.distro_family = family_for_distro(&self.distro).to_string();
        }
    }

    /// Method lookup keys ordered from most specific to least specific.
    ///
    /// Callers must try keys in this order and stop at the first match:
    /// "os/distro", then "os/family" (when distinct from the distro key),
    /// then plain "os".
    pub fn method_lookup_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(3);

        if !self.distro.is_empty() {
            keys.push(format!("{}/{}", self.os, self.distro));
        }
        if !self.distro_family.is_empty() && self.distro_family != self.distro {
            keys.push(format!("{}/{}", self.os, self.distro_family));
        }
        keys.push(self.os.clone());

        keys
    }

}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.os)?;
        if !self.distro.is_empty() {
            write!(f, " {}", self.distro)?;
        }
        write!(f, " {}", self.arch)?;
        if !self.package_manager.is_empty() {
            write!(f, " ({})", self.package_manager)?;
        }
        Ok(())
    }
}

/// Map Rust's OS name onto the catalog's platform keys.
///
/// Catalog files use "darwin" (matching uname and the shell fragments that
/// branch on `$CURRENT_PLATFORM`), not "macos".
fn normalize_os(os: &str) -> String {
    match os {
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// Fallback family mapping for distros that omit ID_LIKE.
fn family_for_distro(distro: &str) -> &'static str {
    match distro {
        "ubuntu" | "pop" | "mint" | "elementary" => "debian",
        "fedora" | "centos" | "rhel" | "rocky" | "alma" => "rhel",
        "arch" | "manjaro" | "endeavouros" => "arch",
        _ => "",
    }
}

/// Check whether a command exists in PATH.
pub fn command_exists(cmd: &str) -> bool {
    which::which(Path::new(cmd)).is_ok()
}
