//! Component catalog: typed, declarative component descriptions
//!
//! A catalog is a directory of YAML files, one per component, plus an
//! optional `scaffold.yaml` describing component groups and shell load
//! order. The catalog only yields already-structured data; nothing else in
//! sprout parses raw configuration.
//!
//! Component schema:
//!
//! ```yaml
//! name: git
//! description: Git version control helpers
//! install:
//!   tools:
//!     - name: git
//!       check: command -v git
//!       methods:
//!         darwin: { type: brew }
//!         linux/debian: { type: apt }
//! shell:
//!   env: |
//!     export DEFAULT_REPOS_DIR="${DEFAULT_REPOS_DIR:-$HOME/Repos}"
//!   aliases: |
//!     alias gs='git status'
//! files:
//!   - target: ${XDG_CONFIG_HOME}/ghostty/config
//!     format: ghostty
//!     values:
//!       theme: Catppuccin Mocha
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, SproutError};
use crate::shell::order::Scaffold;

/// File name reserved for the scaffold, never a component.
const SCAFFOLD_FILE: &str = "scaffold.yaml";

/// A complete component description as loaded from `<name>.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentSpec {
    /// Component name; defaults to the catalog file stem when omitted
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub shell: ShellFragments,

    #[serde(default)]
    pub files: Vec<FileConfig>,
}

/// Tool installation section of a component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstallConfig {
    #[serde(default)]
    pub tools: Vec<ToolRequirement>,
}

/// One external tool a component needs on the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolRequirement {
    /// Command name (also the default package name)
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Shell predicate establishing presence. Two recognized shapes:
    /// `command -v <name>` (pure presence check) or an arbitrary command
    /// whose success implies presence and whose first output line is the
    /// installed version.
    #[serde(default)]
    pub check: String,

    /// Install methods keyed by platform key ("darwin", "linux/debian", ...).
    /// Exactly one method per key.
    #[serde(default)]
    pub methods: BTreeMap<String, InstallMethod>,

    /// Prerequisite references resolved before this tool.
    /// Form: "component:tool"; a bare "tool" is only accepted when the
    /// command is already present on the host.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Guidance printed after a successful install.
    #[serde(default)]
    pub post_install: Option<String>,
}

/// How to install a tool on one platform. Pure data, never executable code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstallMethod {
    #[serde(rename = "type")]
    pub kind: MethodKind,

    /// Package name override; the tool name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Install globally (language package managers)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub global: bool,

    /// Script URL (script-download methods)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Extra arguments appended to the synthesized invocation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Closed set of install method kinds.
///
/// Unknown kinds are rejected at catalog-parse time; dispatch over this
/// enum is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    // System package managers
    Brew,
    Apt,
    Dnf,
    Pacman,
    // Language package managers
    Npm,
    Cargo,
    Pip,
    Go,
    // Script download piped into an interpreter
    Curl,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MethodKind::Brew => "brew",
            MethodKind::Apt => "apt",
            MethodKind::Dnf => "dnf",
            MethodKind::Pacman => "pacman",
            MethodKind::Npm => "npm",
            MethodKind::Cargo => "cargo",
            MethodKind::Pip => "pip",
            MethodKind::Go => "go",
            MethodKind::Curl => "curl",
        };
        f.write_str(name)
    }
}

/// Raw shell fragments concatenated into the component's generated script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShellFragments {
    #[serde(default)]
    pub env: String,

    #[serde(default)]
    pub aliases: String,

    #[serde(default)]
    pub functions: String,

    #[serde(default)]
    pub completions: String,
}

/// A config file a component declares for generation.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    /// Target path; supports `${VAR}` expansion and a leading `~`
    pub target: String,

    /// Writer format identifier ("json", "ghostty", ...)
    pub format: String,

    /// Platforms this file applies to; empty means all
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Nested value tree handed to the writer
    #[serde(default)]
    pub values: serde_json::Value,
}

/// A directory-backed component catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    /// Open a catalog directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(SproutError::CatalogNotFound {
                path: dir.display().to_string(),
            });
        }
        Ok(Catalog { dir })
    }

    /// The catalog directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All component names, sorted, derived from `*.yaml` file stems.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if file_name == SCAFFOLD_FILE {
                    return None;
                }
                file_name.strip_suffix(".yaml").map(ToString::to_string)
            })
            .collect();
        names.sort();
        names
    }

    /// Load a component description by name.
    pub fn load(&self, name: &str) -> Result<ComponentSpec> {
        let path = self.dir.join(format!("{name}.yaml"));
        if !path.is_file() {
            return Err(SproutError::UnknownComponent {
                name: name.to_string(),
                available: self.component_names().join(", "),
            });
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| SproutError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut spec: ComponentSpec =
            serde_yaml::from_str(&content).map_err(|e| SproutError::CatalogParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        // File stem is authoritative when the name field is omitted
        if spec.name.is_empty() {
            spec.name = name.to_string();
        }

        Ok(spec)
    }

    /// Load a component's declared tool requirements.
    pub fn tool_requirements(&self, name: &str) -> Result<Vec<ToolRequirement>> {
        Ok(self.load(name)?.install.tools)
    }

    /// Load the scaffold if one is present.
    pub fn scaffold(&self) -> Result<Option<Scaffold>> {
        let path = self.dir.join(SCAFFOLD_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| SproutError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let scaffold: Scaffold =
            serde_yaml::from_str(&content).map_err(|e| SproutError::CatalogParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(scaffold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_with(files: &[(&str, &str)]) -> (TempDir, Catalog) {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(temp.path().join(name), content).unwrap();
        }
        let catalog = Catalog::open(temp.path()).unwrap();
        (temp, catalog)
    }

    #[test]
    fn test_open_missing_dir() {
        let result = Catalog::open("/definitely/not/a/real/catalog");
        assert!(matches!(result, Err(SproutError::CatalogNotFound { .. })));
    }

    #[test]
    fn test_component_names_sorted_and_scaffold_excluded() {
        let (_temp, catalog) = catalog_with(&[
            ("tmux.yaml", "name: tmux\n"),
            ("git.yaml", "name: git\n"),
            ("scaffold.yaml", "name: default\ngroups: []\n"),
            ("README.md", "not a component\n"),
        ]);
        assert_eq!(catalog.component_names(), vec!["git", "tmux"]);
    }

    #[test]
    fn test_load_full_component() {
        let (_temp, catalog) = catalog_with(&[(
            "git.yaml",
            r#"name: git
description: Git version control helpers
install:
  tools:
    - name: git
      check: command -v git
      methods:
        darwin: { type: brew }
        linux/debian: { type: apt, package: git-all }
shell:
  aliases: |
    alias gs='git status'
files:
  - target: ~/.gitconfig.d/theme
    format: json
    platforms: [darwin]
    values:
      color: auto
"#,
        )]);

        let spec = catalog.load("git").unwrap();
        assert_eq!(spec.name, "git");
        assert_eq!(spec.install.tools.len(), 1);

        let tool = &spec.install.tools[0];
        assert_eq!(tool.check, "command -v git");
        assert_eq!(tool.methods["darwin"].kind, MethodKind::Brew);
        assert_eq!(
            tool.methods["linux/debian"].package.as_deref(),
            Some("git-all")
        );

        assert!(spec.shell.aliases.contains("alias gs"));
        assert_eq!(spec.files.len(), 1);
        assert_eq!(spec.files[0].platforms, vec!["darwin"]);
    }

    #[test]
    fn test_load_unknown_component_lists_available() {
        let (_temp, catalog) = catalog_with(&[("git.yaml", "name: git\n")]);
        let err = catalog.load("mystery").unwrap_err();
        match err {
            SproutError::UnknownComponent { available, .. } => {
                assert!(available.contains("git"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_method_kind_rejected() {
        let (_temp, catalog) = catalog_with(&[(
            "bad.yaml",
            "name: bad\ninstall:\n  tools:\n    - name: x\n      methods:\n        darwin: { type: chocolatey }\n",
        )]);
        let err = catalog.load("bad").unwrap_err();
        assert!(matches!(err, SproutError::CatalogParseFailed { .. }));
    }

    #[test]
    fn test_name_defaults_to_file_stem() {
        let (_temp, catalog) = catalog_with(&[("jq.yaml", "description: JSON processor\n")]);
        let spec = catalog.load("jq").unwrap();
        assert_eq!(spec.name, "jq");
    }

    #[test]
    fn test_scaffold_absent() {
        let (_temp, catalog) = catalog_with(&[("git.yaml", "name: git\n")]);
        assert!(catalog.scaffold().unwrap().is_none());
    }
}
