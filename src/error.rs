//! Error types and handling for Sprout
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants fall into four families: configuration errors (bad or missing
//! catalog data, always fatal for the current operation), platform errors
//! (no install method matches the detected host), execution errors (an
//! external process failed; recorded per tool in results rather than
//! propagated), and I/O errors (always fatal, carrying the offending path).
//! Recoverable conditions such as "already installed" or "already injected"
//! are modeled as result states, not errors.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Sprout operations
#[derive(Error, Diagnostic, Debug)]
pub enum SproutError {
    // Catalog errors
    #[error("Component '{name}' not found (available: {available})")]
    #[diagnostic(
        code(sprout::catalog::unknown_component),
        help("Check the component name, or add <name>.yaml to the catalog directory")
    )]
    UnknownComponent { name: String, available: String },

    #[error("Catalog directory not found: {path}")]
    #[diagnostic(
        code(sprout::catalog::not_found),
        help("Create the catalog directory or point --catalog at an existing one")
    )]
    CatalogNotFound { path: String },

    #[error("Failed to parse catalog file: {path}")]
    #[diagnostic(code(sprout::catalog::parse_failed))]
    CatalogParseFailed { path: String, reason: String },

    #[error("Component '{component}' declares no tools to install")]
    #[diagnostic(code(sprout::catalog::no_tools))]
    NoToolsDeclared { component: String },

    // Resolver errors
    #[error("Ambiguous prerequisite '{name}': no owning component specified")]
    #[diagnostic(
        code(sprout::resolver::ambiguous_prerequisite),
        help("Use the 'component:tool' form so the prerequisite can be resolved")
    )]
    AmbiguousPrerequisite { name: String },

    #[error("Prerequisite tool '{tool}' not found in component '{component}'")]
    #[diagnostic(code(sprout::resolver::prerequisite_not_found))]
    PrerequisiteNotFound { tool: String, component: String },

    #[error("Circular prerequisite chain: {chain}")]
    #[diagnostic(
        code(sprout::resolver::circular_prerequisite),
        help("Remove the cycle from the components' tool requirements")
    )]
    CircularPrerequisite { chain: String },

    // Platform errors
    #[error("No install method for '{tool}' on {platform}")]
    #[diagnostic(
        code(sprout::platform::no_install_method),
        help("Add a method for this platform to the tool's 'methods' map")
    )]
    NoInstallMethod { tool: String, platform: String },

    // Execution errors
    #[error("'{program}' is not available on this system")]
    #[diagnostic(code(sprout::exec::unavailable))]
    ExecutorUnavailable { program: String },

    #[error("Install method is invalid: {reason}")]
    #[diagnostic(code(sprout::exec::invalid_method))]
    InvalidMethod { reason: String },

    #[error("{program} failed: {reason}")]
    #[diagnostic(code(sprout::exec::command_failed))]
    CommandFailed { program: String, reason: String },

    #[error("Failed to fetch install script from {url}: {reason}")]
    #[diagnostic(code(sprout::exec::fetch_failed))]
    FetchFailed { url: String, reason: String },

    #[error("Install script from {url} failed: {reason}")]
    #[diagnostic(code(sprout::exec::script_failed))]
    ScriptFailed { url: String, reason: String },

    #[error("{failed} tool(s) failed to install for component '{component}'")]
    #[diagnostic(code(sprout::exec::install_failed))]
    InstallFailed { component: String, failed: usize },

    // Config file errors
    #[error("Unknown config file format '{format}' (available: {available})")]
    #[diagnostic(code(sprout::configfile::unknown_format))]
    UnknownFormat { format: String, available: String },

    #[error("Failed to render {target}: {reason}")]
    #[diagnostic(code(sprout::configfile::render_failed))]
    RenderFailed { target: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(sprout::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(sprout::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}")]
    #[diagnostic(code(sprout::fs::create_dir_failed))]
    CreateDirFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(sprout::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SproutError {
    fn from(err: std::io::Error) -> Self {
        SproutError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SproutError {
    fn from(err: serde_yaml::Error) -> Self {
        SproutError::CatalogParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SproutError {
    fn from(err: serde_json::Error) -> Self {
        SproutError::RenderFailed {
            target: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for SproutError {
    fn from(err: inquire::InquireError) -> Self {
        SproutError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SproutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SproutError::UnknownComponent {
            name: "mystery".to_string(),
            available: "git, tmux".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Component 'mystery' not found (available: git, tmux)"
        );
    }

    #[test]
    fn test_error_code() {
        let err = SproutError::NoInstallMethod {
            tool: "jq".to_string(),
            platform: "darwin".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("sprout::platform::no_install_method".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SproutError = io_err.into();
        assert!(matches!(err, SproutError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let err: SproutError = parse_result.unwrap_err().into();
        assert!(matches!(err, SproutError::CatalogParseFailed { .. }));
    }

    #[test]
    fn test_circular_prerequisite_chain() {
        let err = SproutError::CircularPrerequisite {
            chain: "a -> b -> a".to_string(),
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_unknown_format_lists_available() {
        let err = SproutError::UnknownFormat {
            format: "ini".to_string(),
            available: "ghostty, json, tmux".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("ini"));
        assert!(message.contains("json"));
    }
}
