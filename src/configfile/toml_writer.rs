//! TOML format writer

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for TOML config files.
///
/// The JSON value tree is converted to a TOML document. Null values are not
/// representable in TOML and fail the render rather than being silently
/// dropped.
pub struct TomlWriter;

impl Writer for TomlWriter {
    fn format(&self) -> &'static str {
        "toml"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let value = json_to_toml(values)?;
        if !value.is_table() {
            return Err(render_error("toml documents must have a table at the root"));
        }
        let content = toml::to_string_pretty(&value).map_err(|e| render_error(e.to_string()))?;
        Ok(content.into_bytes())
    }
}

fn json_to_toml(value: &serde_json::Value) -> Result<toml::Value> {
    match value {
        serde_json::Value::Null => Err(render_error("null values are not representable in TOML")),
        serde_json::Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(toml::Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(toml::Value::Float(f))
            } else {
                Err(render_error(format!("number {n} is out of TOML range")))
            }
        }
        serde_json::Value::String(s) => Ok(toml::Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            let converted: Result<Vec<toml::Value>> = items.iter().map(json_to_toml).collect();
            Ok(toml::Value::Array(converted?))
        }
        serde_json::Value::Object(map) => {
            let mut table = toml::map::Map::new();
            for (key, value) in map {
                table.insert(key.clone(), json_to_toml(value)?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_valid_toml() {
        let content = TomlWriter
            .render(&json!({
                "theme": "mocha",
                "font": {"family": "JetBrainsMono", "size": 14},
            }))
            .unwrap();

        let parsed: toml::Value = toml::from_str(&String::from_utf8(content).unwrap()).unwrap();
        assert_eq!(parsed["theme"].as_str(), Some("mocha"));
        assert_eq!(parsed["font"]["size"].as_integer(), Some(14));
    }

    #[test]
    fn test_scalar_after_table_still_parses() {
        // Key order in the tree puts a table before a scalar; the rendered
        // document must still be valid TOML.
        let content = TomlWriter
            .render(&json!({"aaa": {"nested": 1}, "zzz": "scalar"}))
            .unwrap();
        let text = String::from_utf8(content).unwrap();
        assert!(toml::from_str::<toml::Value>(&text).is_ok());
    }

    #[test]
    fn test_null_is_an_error() {
        let err = TomlWriter.render(&json!({"broken": null})).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_non_table_root_is_an_error() {
        assert!(TomlWriter.render(&json!(["a", "b"])).is_err());
    }
}
