//! tmux option writer

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for tmux global options: one `set -g <option> <value>` line per
/// entry. Values containing whitespace are double-quoted.
pub struct TmuxWriter;

impl Writer for TmuxWriter {
    fn format(&self) -> &'static str {
        "tmux"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let Some(map) = values.as_object() else {
            return Err(render_error("tmux values must be a flat mapping"));
        };

        let mut content = String::new();
        for (option, value) in map {
            let rendered = match value {
                serde_json::Value::String(s) => quote(s),
                serde_json::Value::Bool(b) => if *b { "on" } else { "off" }.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => {
                    return Err(render_error(format!(
                        "tmux option '{option}' must be a scalar value"
                    )));
                }
            };
            content.push_str(&format!("set -g {option} {rendered}\n"));
        }

        Ok(content.into_bytes())
    }
}

fn quote(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}
