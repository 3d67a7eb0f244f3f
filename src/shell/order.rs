//! Shell component load ordering
//!
//! The scaffold declares component groups and a two-tier shell load order:
//! bootstrap components always load first (they establish shell detection,
//! XDG variables, theming and core utilities that later components rely
//! on), then either an explicit optional list or every grouped component
//! in declaration order.

use serde::Deserialize;

/// Scaffold configuration: groups plus shell load order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scaffold {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Component groups in declaration order.
    #[serde(default)]
    pub groups: Vec<ScaffoldGroup>,

    #[serde(default)]
    pub shell_order: ShellOrder,
}

/// A named group of components.
#[derive(Debug, Clone, Deserialize)]
pub struct ScaffoldGroup {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub components: Vec<String>,
}

/// Two-tier shell script load order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShellOrder {
    /// Components that must load first, exactly in this order.
    #[serde(default)]
    pub bootstrap: Vec<String>,

    /// Optional components after bootstrap.
    ///
    /// `None` (key omitted): all grouped components are auto-included in
    /// group declaration order. `Some([])` (explicit empty list): no
    /// optional components at all. `Some([...])`: the listed components,
    /// in that order.
    #[serde(default)]
    pub optional: Option<Vec<String>>,
}

/// Bootstrap names used when no scaffold is present.
pub const DEFAULT_BOOTSTRAP: &[&str] = &["shell", "xdg", "theme", "core"];

impl Scaffold {
    /// Compute the final shell component load order.
    ///
    /// Bootstrap entries come first verbatim and always precede optional
    /// entries regardless of group declarations. No name appears twice.
    pub fn resolve_shell_order(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();

        for name in &self.shell_order.bootstrap {
            if seen.insert(name.as_str()) {
                result.push(name.clone());
            }
        }

        match &self.shell_order.optional {
            Some(optional) => {
                // Explicit list: user takes full control of the tail
                for name in optional {
                    if seen.insert(name.as_str()) {
                        result.push(name.clone());
                    }
                }
            }
            None => {
                // Derive from groups in declaration order, first-seen wins
                for group in &self.groups {
                    for name in &group.components {
                        if seen.insert(name.as_str()) {
                            result.push(name.clone());
                        }
                    }
                }
            }
        }

        result
    }

    /// Group a component belongs to, if any.
    pub fn component_group(&self, component: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.components.iter().any(|c| c == component))
            .map(|group| group.name.as_str())
    }
}

/// Fallback order used when the catalog has no scaffold: default bootstrap
/// names first (when registered), then the remaining names as given.
pub fn default_order(registered: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for name in DEFAULT_BOOTSTRAP {
        if registered.iter().any(|r| r == name) {
            result.push((*name).to_string());
        }
    }
    for name in registered {
        if !result.iter().any(|r| r == name) {
            result.push(name.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaffold(yaml: &str) -> Scaffold {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_bootstrap_then_groups() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: core-tools
    components: [core, git, tmux]
  - name: devops
    components: [docker, git]
shell_order:
  bootstrap: [shell, xdg]
"#,
        );
        assert_eq!(
            s.resolve_shell_order(),
            vec!["shell", "xdg", "core", "git", "tmux", "docker"]
        );
    }

    #[test]
    fn test_explicit_optional_list() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: everything
    components: [git, tmux, docker]
shell_order:
  bootstrap: [shell]
  optional: [tmux, shell]
"#,
        );
        // Explicit list wins over groups; bootstrap entries never repeat
        assert_eq!(s.resolve_shell_order(), vec!["shell", "tmux"]);
    }

    #[test]
    fn test_empty_optional_means_bootstrap_only() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: everything
    components: [git, tmux]
shell_order:
  bootstrap: [shell, xdg]
  optional: []
"#,
        );
        assert_eq!(s.resolve_shell_order(), vec!["shell", "xdg"]);
    }

    #[test]
    fn test_no_duplicates_across_groups() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: a
    components: [git]
  - name: b
    components: [git, jq]
shell_order:
  bootstrap: []
"#,
        );
        assert_eq!(s.resolve_shell_order(), vec!["git", "jq"]);
    }

    #[test]
    fn test_bootstrap_precedes_grouped_duplicate() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: a
    components: [theme, git]
shell_order:
  bootstrap: [shell, theme]
"#,
        );
        assert_eq!(s.resolve_shell_order(), vec!["shell", "theme", "git"]);
    }

    #[test]
    fn test_component_group() {
        let s = scaffold(
            r#"
name: default
groups:
  - name: vcs
    components: [git]
"#,
        );
        assert_eq!(s.component_group("git"), Some("vcs"));
        assert_eq!(s.component_group("tmux"), None);
    }

    #[test]
    fn test_default_order() {
        let registered = vec![
            "git".to_string(),
            "shell".to_string(),
            "core".to_string(),
        ];
        assert_eq!(default_order(&registered), vec!["shell", "core", "git"]);
    }
}
