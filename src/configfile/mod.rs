//! Config file generation in various formats
//!
//! A [`WriterRegistry`] maps format identifiers to writers. The registry is
//! an explicit value populated with the built-in writers at construction;
//! there is no global mutable state. Writers are pure functions over a
//! value tree — no environment lookups, no clock — so identical input
//! always renders byte-identical output.

mod ghostty;
mod iterm2;
mod json;
mod tmux;
mod toml_writer;
mod yaml;

pub use ghostty::GhosttyWriter;
pub use iterm2::ITerm2Writer;
pub use json::JsonWriter;
pub use tmux::TmuxWriter;
pub use toml_writer::TomlWriter;
pub use yaml::YamlWriter;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::FileConfig;
use crate::error::{Result, SproutError};

/// A config file format writer.
pub trait Writer {
    /// Format identifier (e.g. "ghostty", "json", "tmux")
    fn format(&self) -> &'static str;

    /// Render the value tree to file bytes.
    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>>;
}

/// Registry of format writers, keyed by format identifier.
pub struct WriterRegistry {
    writers: BTreeMap<&'static str, Box<dyn Writer>>,
}

impl WriterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        WriterRegistry {
            writers: BTreeMap::new(),
        }
    }

    /// The registry with all built-in writers registered.
    pub fn with_builtin_writers() -> Self {
        let mut registry = WriterRegistry::new();
        registry.register(Box::new(JsonWriter));
        registry.register(Box::new(YamlWriter));
        registry.register(Box::new(TomlWriter));
        registry.register(Box::new(GhosttyWriter));
        registry.register(Box::new(TmuxWriter));
        registry.register(Box::new(ITerm2Writer));
        registry
    }

    /// Add a writer. Last registration for a format wins.
    pub fn register(&mut self, writer: Box<dyn Writer>) {
        self.writers.insert(writer.format(), writer);
    }

    /// Look up a writer by format identifier.
    pub fn get(&self, format: &str) -> Result<&dyn Writer> {
        self.writers
            .get(format)
            .map(AsRef::as_ref)
            .ok_or_else(|| SproutError::UnknownFormat {
                format: format.to_string(),
                available: self.formats().join(", "),
            })
    }

    /// Registered format identifiers, sorted.
    pub fn formats(&self) -> Vec<&'static str> {
        self.writers.keys().copied().collect()
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        WriterRegistry::with_builtin_writers()
    }
}

/// A generated config file with metadata.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub target: String,
    pub format: String,
    pub content: String,
    pub written: bool,
}

/// Renders declared config files to disk (or previews them under dry-run).
pub struct FileRenderer {
    registry: WriterRegistry,
    dry_run: bool,
}

impl FileRenderer {
    pub fn new(dry_run: bool) -> Self {
        FileRenderer {
            registry: WriterRegistry::with_builtin_writers(),
            dry_run,
        }
    }

    /// Generate a single config file.
    ///
    /// Expands environment variables and a leading `~` in the target path,
    /// renders through the writer, and — unless dry-run — creates parent
    /// directories and writes the file.
    pub fn generate_file(&self, config: &FileConfig) -> Result<GeneratedFile> {
        let writer = self.registry.get(&config.format)?;

        let target = expand_path(&config.target);
        let content = writer.render(&config.values).map_err(|e| match e {
            SproutError::RenderFailed { reason, .. } => SproutError::RenderFailed {
                target: target.display().to_string(),
                reason,
            },
            other => other,
        })?;

        let mut generated = GeneratedFile {
            target: target.display().to_string(),
            format: config.format.clone(),
            content: String::from_utf8_lossy(&content).into_owned(),
            written: false,
        };

        if !self.dry_run {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SproutError::CreateDirFailed {
                    path: parent.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
            std::fs::write(&target, &content).map_err(|e| SproutError::FileWriteFailed {
                path: target.display().to_string(),
                reason: e.to_string(),
            })?;
            generated.written = true;
        }

        Ok(generated)
    }

    /// Generate all config files in order, stopping at the first failure.
    pub fn generate_files(&self, configs: &[FileConfig]) -> Result<Vec<GeneratedFile>> {
        let mut results = Vec::with_capacity(configs.len());
        for config in configs {
            results.push(self.generate_file(config)?);
        }
        Ok(results)
    }
}

/// Expand `${VAR}` / `$VAR` references and a leading `~` in a path.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = expand_env(path);

    if let Some(rest) = expanded.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    PathBuf::from(expanded)
}

/// Expand environment variable references; missing variables expand to "".
fn expand_env(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some((_, '{')) => {
                chars.next();
                let name: String = chars
                    .by_ref()
                    .map(|(_, c)| c)
                    .take_while(|c| *c != '}')
                    .collect();
                result.push_str(&std::env::var(&name).unwrap_or_default());
            }
            Some((_, c)) if c.is_ascii_alphabetic() || *c == '_' => {
                let mut name = String::new();
                while let Some((_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || *c == '_' {
                        name.push(*c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                result.push_str(&std::env::var(&name).unwrap_or_default());
            }
            _ => result.push('$'),
        }
    }

    result
}

/// Error helper used by writers for malformed value trees.
pub(crate) fn render_error(reason: impl Into<String>) -> SproutError {
    SproutError::RenderFailed {
        target: "unknown".to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_registry_has_builtin_formats() {
        let registry = WriterRegistry::with_builtin_writers();
        assert_eq!(
            registry.formats(),
            vec!["ghostty", "iterm2", "json", "tmux", "toml", "yaml"]
        );
    }

    #[test]
    fn test_unknown_format_lists_registered() {
        let registry = WriterRegistry::with_builtin_writers();
        let err = match registry.get("ini") {
            Ok(_) => panic!("expected an error for unknown format"),
            Err(e) => e,
        };
        match err {
            SproutError::UnknownFormat { format, available } => {
                assert_eq!(format, "ini");
                assert!(available.contains("json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_expand_path_env_vars() {
        // SAFETY: process env mutation, guarded by #[serial]
        unsafe {
            std::env::set_var("SPROUT_TEST_DIR", "/opt/test");
        }
        assert_eq!(
            expand_path("${SPROUT_TEST_DIR}/config"),
            PathBuf::from("/opt/test/config")
        );
        assert_eq!(
            expand_path("$SPROUT_TEST_DIR/config"),
            PathBuf::from("/opt/test/config")
        );
        unsafe {
            std::env::remove_var("SPROUT_TEST_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_expand_path_missing_var_is_empty() {
        assert_eq!(
            expand_path("${SPROUT_NOT_SET_XYZ}/path"),
            PathBuf::from("/path")
        );
    }

    #[test]
    fn test_expand_path_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_path("~/config/app"), home.join("config/app"));
        // A tilde anywhere else is literal
        assert_eq!(expand_path("/path/~/x"), PathBuf::from("/path/~/x"));
    }

    #[test]
    fn test_generate_file_dry_run_does_not_write() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("sub").join("config.json");

        let renderer = FileRenderer::new(true);
        let config = FileConfig {
            target: target.display().to_string(),
            format: "json".to_string(),
            platforms: vec![],
            values: json!({"theme": "dark"}),
        };

        let generated = renderer.generate_file(&config).unwrap();
        assert!(!generated.written);
        assert!(generated.content.contains("dark"));
        assert!(!target.exists());
    }

    #[test]
    fn test_generate_file_writes_and_creates_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("dir").join("config.json");

        let renderer = FileRenderer::new(false);
        let config = FileConfig {
            target: target.display().to_string(),
            format: "json".to_string(),
            platforms: vec![],
            values: json!({"key": "value"}),
        };

        let generated = renderer.generate_file(&config).unwrap();
        assert!(generated.written);

        let on_disk = std::fs::read_to_string(&target).unwrap();
        assert_eq!(on_disk, generated.content);
    }

    #[test]
    fn test_rendering_is_pure() {
        let renderer = FileRenderer::new(true);
        let config = FileConfig {
            target: "/tmp/never-written".to_string(),
            format: "yaml".to_string(),
            platforms: vec![],
            values: json!({"b": 2, "a": 1, "nested": {"y": true, "x": false}}),
        };

        let first = renderer.generate_file(&config).unwrap();
        let second = renderer.generate_file(&config).unwrap();
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn test_generate_file_unknown_format() {
        let renderer = FileRenderer::new(true);
        let config = FileConfig {
            target: "/tmp/x".to_string(),
            format: "ini".to_string(),
            platforms: vec![],
            values: json!({}),
        };
        assert!(matches!(
            renderer.generate_file(&config),
            Err(SproutError::UnknownFormat { .. })
        ));
    }
}
