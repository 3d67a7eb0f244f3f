//! JSON format writer

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for pretty-printed JSON config files (editor settings and
/// similar). The value tree is marshaled as-is; object keys serialize in
/// sorted order, so output is deterministic.
pub struct JsonWriter;

impl Writer for JsonWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let mut content =
            serde_json::to_vec_pretty(values).map_err(|e| render_error(e.to_string()))?;
        content.push(b'\n');
        Ok(content)
    }
}
