//! YAML format writer

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for YAML config files.
pub struct YamlWriter;

impl Writer for YamlWriter {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let content = serde_yaml::to_string(values).map_err(|e| render_error(e.to_string()))?;
        Ok(content.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_valid_yaml() {
        let content = YamlWriter
            .render(&json!({"session": {"windows": ["editor", "logs"]}}))
            .unwrap();

        let parsed: serde_yaml::Value = serde_yaml::from_slice(&content).unwrap();
        assert_eq!(parsed["session"]["windows"][0], "editor");
    }

    #[test]
    fn test_scalar_values() {
        let content = YamlWriter
            .render(&json!({"enabled": true, "retries": 3}))
            .unwrap();
        let text = String::from_utf8(content).unwrap();
        assert!(text.contains("enabled: true"));
        assert!(text.contains("retries: 3"));
    }
}
