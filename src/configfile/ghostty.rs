//! Ghostty terminal config writer

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for Ghostty's flat `key = value` config format.
pub struct GhosttyWriter;

impl Writer for GhosttyWriter {
    fn format(&self) -> &'static str {
        "ghostty"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let Some(map) = values.as_object() else {
            return Err(render_error("ghostty values must be a flat mapping"));
        };

        let mut content = String::new();
        for (key, value) in map {
            content.push_str(&format!("{key} = {}\n", scalar(key, value)?));
        }

        Ok(content.into_bytes())
    }
}

fn scalar(key: &str, value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(render_error(format!(
            "ghostty entry '{key}' must be a scalar value"
        ))),
    }
}
