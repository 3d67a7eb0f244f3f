//! iTerm2 dynamic profile writer
//!
//! Turns a sectioned value tree (`profile`, `font`, `terminal`, `cursor`,
//! `colors`) into the JSON plist iTerm2 expects under
//! `DynamicProfiles/`. Hex colors (`#RRGGBB`) become normalized sRGB
//! component dicts. A `colors.scheme` reference pulls from a fixed table of
//! named schemes; inline color keys override scheme entries.

use serde_json::{Map, Value, json};

use super::{Writer, render_error};
use crate::error::Result;

/// Writer for iTerm2 dynamic profile JSON.
pub struct ITerm2Writer;

impl Writer for ITerm2Writer {
    fn format(&self) -> &'static str {
        "iterm2"
    }

    fn render(&self, values: &serde_json::Value) -> Result<Vec<u8>> {
        let Some(sections) = values.as_object() else {
            return Err(render_error("iterm2 values must be a mapping of sections"));
        };

        let mut profile = Map::new();

        if let Some(p) = sections.get("profile").and_then(Value::as_object) {
            apply_profile(&mut profile, p);
        }
        if let Some(f) = sections.get("font").and_then(Value::as_object) {
            apply_font(&mut profile, f);
        }
        if let Some(t) = sections.get("terminal").and_then(Value::as_object) {
            apply_terminal(&mut profile, t);
        }
        if let Some(c) = sections.get("cursor").and_then(Value::as_object) {
            apply_cursor(&mut profile, c);
        }
        if let Some(c) = sections.get("colors").and_then(Value::as_object) {
            apply_colors(&mut profile, c)?;
        }

        let output = json!({ "Profiles": [Value::Object(profile)] });
        let mut content =
            serde_json::to_vec_pretty(&output).map_err(|e| render_error(e.to_string()))?;
        content.push(b'\n');
        Ok(content)
    }
}

fn copy_str(
    profile: &mut Map<String, Value>,
    plist_key: &str,
    section: &Map<String, Value>,
    key: &str,
) {
    if let Some(s) = section.get(key).and_then(Value::as_str) {
        profile.insert(plist_key.to_string(), json!(s));
    }
}

fn apply_profile(profile: &mut Map<String, Value>, section: &Map<String, Value>) {
    copy_str(profile, "Name", section, "name");
    copy_str(profile, "Guid", section, "guid");
    copy_str(profile, "Dynamic Profile Parent Name", section, "parent");
    copy_str(profile, "Description", section, "description");
}

fn apply_font(profile: &mut Map<String, Value>, section: &Map<String, Value>) {
    let family = section
        .get("family")
        .and_then(Value::as_str)
        .unwrap_or("Menlo");
    let size = section.get("size").and_then(Value::as_i64).unwrap_or(14);

    let spec = format!("{family} {size}");
    profile.insert("Normal Font".to_string(), json!(spec.clone()));
    profile.insert("Non Ascii Font".to_string(), json!(spec));
    profile.insert("Use Non-ASCII Font".to_string(), json!(false));

    let anti_aliased = section
        .get("anti_aliased")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    profile.insert("ASCII Anti Aliased".to_string(), json!(anti_aliased));
    profile.insert("Non-ASCII Anti Aliased".to_string(), json!(anti_aliased));
}

fn apply_terminal(profile: &mut Map<String, Value>, section: &Map<String, Value>) {
    let terminal_type = section
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("xterm-256color");
    profile.insert("Terminal Type".to_string(), json!(terminal_type));

    // UTF-8
    profile.insert("Character Encoding".to_string(), json!(4));

    let scrollback = section
        .get("scrollback_lines")
        .and_then(Value::as_i64)
        .unwrap_or(50_000);
    profile.insert("Scrollback Lines".to_string(), json!(scrollback));

    let unlimited = section
        .get("unlimited_scrollback")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    profile.insert("Unlimited Scrollback".to_string(), json!(unlimited));
}

fn apply_cursor(profile: &mut Map<String, Value>, section: &Map<String, Value>) {
    let cursor_type = match section.get("type").and_then(Value::as_str) {
        Some("underline") => 1,
        Some("bar" | "ibeam" | "vertical") => 2,
        _ => 0, // block
    };
    profile.insert("Cursor Type".to_string(), json!(cursor_type));

    let blinking = section
        .get("blinking")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    profile.insert("Blinking Cursor".to_string(), json!(blinking));
}

fn apply_colors(profile: &mut Map<String, Value>, section: &Map<String, Value>) -> Result<()> {
    if let Some(scheme_name) = section.get("scheme").and_then(Value::as_str) {
        let scheme = named_scheme(scheme_name)
            .ok_or_else(|| render_error(format!("unknown iterm2 color scheme '{scheme_name}'")))?;
        apply_scheme(profile, scheme);
    }

    // Inline colors override scheme entries
    for (key, plist_key) in [
        ("background", "Background Color"),
        ("foreground", "Foreground Color"),
        ("bold", "Bold Color"),
        ("cursor", "Cursor Color"),
        ("cursor_text", "Cursor Text Color"),
        ("selection", "Selection Color"),
        ("selected_text", "Selected Text Color"),
    ] {
        if let Some(hex) = section.get(key).and_then(Value::as_str) {
            profile.insert(plist_key.to_string(), hex_to_color(hex));
        }
    }

    if let Some(ansi) = section.get("ansi").and_then(Value::as_array) {
        if ansi.len() != 16 {
            return Err(render_error("iterm2 ansi palette must have 16 entries"));
        }
        for (i, entry) in ansi.iter().enumerate() {
            if let Some(hex) = entry.as_str() {
                profile.insert(format!("Ansi {i} Color"), hex_to_color(hex));
            }
        }
    }

    Ok(())
}

/// A named color scheme: background, foreground, cursor, 16 ANSI colors.
struct Scheme {
    background: &'static str,
    foreground: &'static str,
    cursor: &'static str,
    selection: &'static str,
    ansi: [&'static str; 16],
}

static CATPPUCCIN_MOCHA: Scheme = Scheme {
    background: "#1e1e2e",
    foreground: "#cdd6f4",
    cursor: "#f38ba8",
    selection: "#3a3c53",
    ansi: [
        "#45475a", "#f38ba8", "#a6e3a1", "#f9e2af", "#89b4fa", "#f5c2e7", "#94e2d5", "#bac2de",
        "#585b70", "#f38ba8", "#a6e3a1", "#f9e2af", "#89b4fa", "#f5c2e7", "#94e2d5", "#cdd6f4",
    ],
};

static CATPPUCCIN_LATTE: Scheme = Scheme {
    background: "#eff1f5",
    foreground: "#4c4f69",
    cursor: "#d20f39",
    selection: "#acb0be",
    ansi: [
        "#5c5f77", "#d20f39", "#40a02b", "#df8e1d", "#1e66f5", "#ea76cb", "#179299", "#acb0be",
        "#6c6f85", "#d20f39", "#40a02b", "#df8e1d", "#1e66f5", "#ea76cb", "#179299", "#4c4f69",
    ],
};

fn named_scheme(name: &str) -> Option<&'static Scheme> {
    match name {
        "catppuccin-mocha" => Some(&CATPPUCCIN_MOCHA),
        "catppuccin-latte" => Some(&CATPPUCCIN_LATTE),
        _ => None,
    }
}

fn apply_scheme(profile: &mut Map<String, Value>, scheme: &Scheme) {
    profile.insert(
        "Background Color".to_string(),
        hex_to_color(scheme.background),
    );
    profile.insert(
        "Foreground Color".to_string(),
        hex_to_color(scheme.foreground),
    );
    profile.insert("Cursor Color".to_string(), hex_to_color(scheme.cursor));
    profile.insert(
        "Selection Color".to_string(),
        hex_to_color(scheme.selection),
    );
    for (i, hex) in scheme.ansi.iter().enumerate() {
        profile.insert(format!("Ansi {i} Color"), hex_to_color(hex));
    }
}

/// Convert #RRGGBB to an iTerm2 color dict with normalized sRGB components.
/// Invalid colors fall back to black.
fn hex_to_color(hex: &str) -> Value {
    let hex = hex.trim_start_matches('#');

    let (r, g, b) = if hex.len() == 6 {
        (
            u8::from_str_radix(&hex[0..2], 16).unwrap_or(0),
            u8::from_str_radix(&hex[2..4], 16).unwrap_or(0),
            u8::from_str_radix(&hex[4..6], 16).unwrap_or(0),
        )
    } else {
        (0, 0, 0)
    };

    json!({
        "Red Component": f64::from(r) / 255.0,
        "Green Component": f64::from(g) / 255.0,
        "Blue Component": f64::from(b) / 255.0,
        "Color Space": "sRGB",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(values: serde_json::Value) -> serde_json::Value {
        let content = ITerm2Writer.render(&values).unwrap();
        serde_json::from_slice(&content).unwrap()
    }

    #[test]
    fn test_profiles_wrapper() {
        let output = render(json!({"profile": {"name": "Sprout", "guid": "sprout-1"}}));
        let profiles = output["Profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["Name"], "Sprout");
        assert_eq!(profiles[0]["Guid"], "sprout-1");
    }

    #[test]
    fn test_font_spec() {
        let output = render(json!({"font": {"family": "JetBrainsMono", "size": 13}}));
        assert_eq!(output["Profiles"][0]["Normal Font"], "JetBrainsMono 13");
    }

    #[test]
    fn test_hex_to_color_normalization() {
        let color = hex_to_color("#ff0080");
        assert_eq!(color["Red Component"], 1.0);
        assert_eq!(color["Green Component"], 0.0);
        assert_eq!(color["Color Space"], "sRGB");
    }

    #[test]
    fn test_invalid_hex_is_black() {
        let color = hex_to_color("#xyz");
        assert_eq!(color["Red Component"], 0.0);
        assert_eq!(color["Blue Component"], 0.0);
    }

    #[test]
    fn test_named_scheme_applied() {
        let output = render(json!({"colors": {"scheme": "catppuccin-mocha"}}));
        let profile = &output["Profiles"][0];
        assert!(profile["Background Color"].is_object());
        assert!(profile["Ansi 15 Color"].is_object());
    }

    #[test]
    fn test_inline_color_overrides_scheme() {
        let output = render(json!({
            "colors": {"scheme": "catppuccin-mocha", "background": "#000000"}
        }));
        let bg = &output["Profiles"][0]["Background Color"];
        assert_eq!(bg["Red Component"], 0.0);
        assert_eq!(bg["Green Component"], 0.0);
        assert_eq!(bg["Blue Component"], 0.0);
    }

    #[test]
    fn test_unknown_scheme_is_an_error() {
        let err = ITerm2Writer
            .render(&json!({"colors": {"scheme": "solarized-plaid"}}))
            .unwrap_err();
        assert!(err.to_string().contains("solarized-plaid"));
    }

    #[test]
    fn test_ansi_palette_must_have_16_entries() {
        let err = ITerm2Writer
            .render(&json!({"colors": {"ansi": ["#000000"]}}))
            .unwrap_err();
        assert!(err.to_string().contains("16"));
    }
}
