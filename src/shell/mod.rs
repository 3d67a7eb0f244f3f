//! Shell integration generation and rc-file injection
//!
//! One script per component plus a single `shell.sh` entrypoint that
//! sources them in resolved load order. The user's shell startup file gets
//! an idempotent, marker-delimited block pointing at the entrypoint;
//! `inject` and `eject` are the only operations that touch it.

pub mod order;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::{ComponentSpec, FileConfig};
use crate::configfile::{FileRenderer, GeneratedFile};
use crate::error::{Result, SproutError};
use crate::paths;
use order::Scaffold;

/// First marker line of the injected block.
pub const INJECT_MARKER_BEGIN: &str = "# >>> sprout shell integration >>>";
/// Last marker line of the injected block.
pub const INJECT_MARKER_END: &str = "# <<< sprout shell integration <<<";

/// Shell integration configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Directory generated scripts are written to
    pub sprout_dir: PathBuf,

    /// The user's shell startup file
    pub rc_file: PathBuf,

    /// "bash" or "zsh"
    pub shell: String,

    /// Detected platform OS, used to filter declared config files
    pub platform: String,

    pub dry_run: bool,
}

impl ShellConfig {
    /// Config for the current user: shell from `$SHELL`, rc file in the
    /// home directory, scripts under the sprout config dir.
    pub fn new(platform: &str, dry_run: bool) -> Self {
        let shell = detect_shell();
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let rc_file = if shell == "zsh" {
            home.join(".zshrc")
        } else {
            home.join(".bashrc")
        };

        ShellConfig {
            sprout_dir: paths::sprout_dir(),
            rc_file,
            shell,
            platform: platform.to_string(),
            dry_run,
        }
    }
}

/// Detect the current shell from `$SHELL`; bash is the fallback.
fn detect_shell() -> String {
    let shell = std::env::var("SHELL").unwrap_or_default();
    if shell.contains("zsh") {
        "zsh".to_string()
    } else {
        "bash".to_string()
    }
}

/// A shell component: fragments concatenated into one generated script.
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub name: String,
    pub description: String,
    pub env: String,
    pub aliases: String,
    pub functions: String,
    pub completions: String,
}

impl From<&ComponentSpec> for Component {
    fn from(spec: &ComponentSpec) -> Self {
        Component {
            name: spec.name.clone(),
            description: spec.description.clone(),
            env: spec.shell.env.clone(),
            aliases: spec.shell.aliases.clone(),
            functions: spec.shell.functions.clone(),
            completions: spec.shell.completions.clone(),
        }
    }
}

/// A generated shell script with metadata.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedScript {
    pub component: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub target: String,
    pub content: String,
    pub written: bool,
}

/// The result of a generate operation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub sprout_dir: String,
    pub shell: String,
    pub platform: String,
    pub dry_run: bool,
    pub scripts: Vec<GeneratedScript>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<GeneratedScript>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<GeneratedFile>,
}

/// What an inject/eject call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectAction {
    Injected,
    AlreadyInjected,
    Ejected,
    NotInjected,
    WouldInject,
    WouldEject,
}

/// The result of an inject/eject operation.
#[derive(Debug, Clone, Serialize)]
pub struct InjectResult {
    pub rc_file: String,
    pub entrypoint: String,
    pub action: InjectAction,
    pub dry_run: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

/// Read-only shell integration status.
#[derive(Debug, Clone, Serialize)]
pub struct ShellStatus {
    pub shell: String,
    pub platform: String,
    pub sprout_dir: String,
    pub sprout_dir_exists: bool,
    pub rc_file: String,
    pub injected: bool,
    pub components: Vec<String>,
    pub generated_files: Vec<String>,
}

/// Handles shell script generation and rc-file injection.
pub struct Manager {
    config: ShellConfig,
    scaffold: Option<Scaffold>,
    components: BTreeMap<String, Component>,
    file_specs: BTreeMap<String, Vec<FileConfig>>,
}

impl Manager {
    pub fn new(config: ShellConfig) -> Self {
        Manager {
            config,
            scaffold: None,
            components: BTreeMap::new(),
            file_specs: BTreeMap::new(),
        }
    }

    /// Attach a scaffold controlling the component load order.
    pub fn set_scaffold(&mut self, scaffold: Scaffold) {
        self.scaffold = Some(scaffold);
    }

    /// Register a component for shell integration.
    pub fn register_component(&mut self, component: Component) {
        self.components.insert(component.name.clone(), component);
    }

    /// Register config files declared by a component.
    pub fn register_component_files(&mut self, name: &str, files: Vec<FileConfig>) {
        if !files.is_empty() {
            self.file_specs.insert(name.to_string(), files);
        }
    }

    /// All registered component names, sorted.
    pub fn list_components(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    /// The component load order: scaffold order filtered to registered
    /// components, then any registered component the scaffold missed.
    pub fn resolve_order(&self) -> Vec<String> {
        let registered = self.list_components();
        let base = match &self.scaffold {
            Some(scaffold) => scaffold.resolve_shell_order(),
            None => order::default_order(&registered),
        };

        let mut result: Vec<String> = base
            .into_iter()
            .filter(|name| self.components.contains_key(name))
            .collect();
        for name in registered {
            if !result.contains(&name) {
                result.push(name);
            }
        }
        result
    }

    fn ensure_dir(&self) -> Result<()> {
        if self.config.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(&self.config.sprout_dir).map_err(|e| {
            SproutError::CreateDirFailed {
                path: self.config.sprout_dir.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Generate shell scripts (and declared config files) for the named
    /// components. An empty name list means every registered component, in
    /// resolved load order.
    pub fn generate_components(&self, names: &[String]) -> Result<GenerateResult> {
        self.ensure_dir()?;

        let names: Vec<String> = if names.is_empty() {
            self.resolve_order()
        } else {
            names.to_vec()
        };

        let mut result = GenerateResult {
            sprout_dir: self.config.sprout_dir.display().to_string(),
            shell: self.config.shell.clone(),
            platform: self.config.platform.clone(),
            dry_run: self.config.dry_run,
            scripts: Vec::with_capacity(names.len()),
            entrypoint: None,
            config_files: Vec::new(),
        };

        let renderer = FileRenderer::new(self.config.dry_run);

        for name in &names {
            let component =
                self.components
                    .get(name)
                    .ok_or_else(|| SproutError::UnknownComponent {
                        name: name.clone(),
                        available: self.list_components().join(", "),
                    })?;

            let content = self.component_script(component);
            let target = self.config.sprout_dir.join(format!("{name}.sh"));
            result
                .scripts
                .push(self.write_script(name, &component.description, target, content)?);

            if let Some(specs) = self.file_specs.get(name) {
                for spec in specs {
                    if !self.applies_to_platform(&spec.platforms) {
                        continue;
                    }
                    result.config_files.push(renderer.generate_file(spec)?);
                }
            }
        }

        Ok(result)
    }

    /// Generate every component script plus the `shell.sh` entrypoint.
    pub fn generate_all(&self) -> Result<GenerateResult> {
        let mut result = self.generate_components(&[])?;

        let content = self.entrypoint_script();
        let target = self.config.sprout_dir.join("shell.sh");
        result.entrypoint = Some(self.write_script(
            "shell",
            "Entrypoint that sources all component scripts",
            target,
            content,
        )?);

        Ok(result)
    }

    fn write_script(
        &self,
        name: &str,
        description: &str,
        target: PathBuf,
        content: String,
    ) -> Result<GeneratedScript> {
        let mut script = GeneratedScript {
            component: name.to_string(),
            description: description.to_string(),
            target: target.display().to_string(),
            content,
            written: false,
        };

        if !self.config.dry_run {
            std::fs::write(&target, &script.content).map_err(|e| {
                SproutError::FileWriteFailed {
                    path: script.target.clone(),
                    reason: e.to_string(),
                }
            })?;
            // Sourced, not executed: plain 0644
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o644);
                std::fs::set_permissions(&target, perms).map_err(|e| {
                    SproutError::FileWriteFailed {
                        path: script.target.clone(),
                        reason: e.to_string(),
                    }
                })?;
            }
            script.written = true;
        }

        Ok(script)
    }

    /// Concatenate a component's fragments into one script, fixed order:
    /// environment, aliases, functions, completions.
    fn component_script(&self, component: &Component) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/sh\n");
        script.push_str(&format!("# Sprout shell integration: {}\n", component.name));
        if !component.description.is_empty() {
            script.push_str(&format!("# {}\n", component.description));
        }
        script.push_str("# Generated by sprout - do not edit manually\n\n");

        for (header, fragment) in [
            ("Environment", &component.env),
            ("Aliases", &component.aliases),
            ("Functions", &component.functions),
            ("Completions", &component.completions),
        ] {
            if !fragment.is_empty() {
                script.push_str(&format!("# {header}\n"));
                script.push_str(fragment);
                if !fragment.ends_with('\n') {
                    script.push('\n');
                }
                script.push('\n');
            }
        }

        script
    }

    /// The `shell.sh` entrypoint: sources every registered component script
    /// in resolved order, each guarded by an existence check so a missing
    /// script is silently skipped.
    fn entrypoint_script(&self) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/sh\n");
        script.push_str("# Sprout shell integration entrypoint\n");
        script.push_str("# Generated by sprout - do not edit manually\n");
        script.push_str("# Source this file from your shell rc file\n\n");

        script.push_str("# Sprout configuration directory\n");
        script.push_str(&format!(
            "SPROUT_CONFIG_DIR=\"{}\"\n\n",
            self.config.sprout_dir.display()
        ));

        script.push_str("# Source component scripts in load order\n");
        for name in self.resolve_order() {
            script.push_str(&format!(
                "[ -f \"$SPROUT_CONFIG_DIR/{name}.sh\" ] && . \"$SPROUT_CONFIG_DIR/{name}.sh\"\n"
            ));
        }

        script.push_str("\n# Sprout CLI completions\n");
        script.push_str("if command -v sprout >/dev/null 2>&1; then\n");
        script.push_str(&format!(
            "    eval \"$(sprout completions --shell {})\"\n",
            self.config.shell
        ));
        script.push_str("fi\n");

        script
    }

    fn applies_to_platform(&self, platforms: &[String]) -> bool {
        platforms.is_empty() || platforms.iter().any(|p| p == &self.config.platform)
    }

    fn entrypoint_path(&self) -> PathBuf {
        self.config.sprout_dir.join("shell.sh")
    }

    /// The marker-delimited block appended to the rc file: one exported
    /// variable and one conditional source line.
    fn injection_block(&self) -> String {
        format!(
            "\n{INJECT_MARKER_BEGIN}\nexport SPROUT_CONFIG_DIR=\"{dir}\"\n[ -f \"$SPROUT_CONFIG_DIR/shell.sh\" ] && . \"$SPROUT_CONFIG_DIR/shell.sh\"\n{INJECT_MARKER_END}\n",
            dir = self.config.sprout_dir.display()
        )
    }

    /// Add the sprout source block to the shell rc file.
    ///
    /// Idempotent: reports `AlreadyInjected` and leaves the file untouched
    /// when the markers are present.
    pub fn inject(&self) -> Result<InjectResult> {
        let mut result = InjectResult {
            rc_file: self.config.rc_file.display().to_string(),
            entrypoint: self.entrypoint_path().display().to_string(),
            action: InjectAction::Injected,
            dry_run: self.config.dry_run,
            block: None,
        };

        let content = read_rc_file(&self.config.rc_file)?.unwrap_or_default();

        if content.contains(INJECT_MARKER_BEGIN) {
            result.action = InjectAction::AlreadyInjected;
            return Ok(result);
        }

        let block = self.injection_block();
        result.block = Some(block.clone());

        if self.config.dry_run {
            result.action = InjectAction::WouldInject;
            return Ok(result);
        }

        let new_content = format!("{content}{block}");
        std::fs::write(&self.config.rc_file, new_content).map_err(|e| {
            SproutError::FileWriteFailed {
                path: result.rc_file.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(result)
    }

    /// Remove the sprout source block from the shell rc file, restoring the
    /// pre-injection content. Reports `NotInjected` when no markers exist.
    pub fn eject(&self) -> Result<InjectResult> {
        let mut result = InjectResult {
            rc_file: self.config.rc_file.display().to_string(),
            entrypoint: self.entrypoint_path().display().to_string(),
            action: InjectAction::Ejected,
            dry_run: self.config.dry_run,
            block: None,
        };

        let Some(content) = read_rc_file(&self.config.rc_file)? else {
            result.action = InjectAction::NotInjected;
            return Ok(result);
        };

        if !content.contains(INJECT_MARKER_BEGIN) {
            result.action = InjectAction::NotInjected;
            return Ok(result);
        }

        if self.config.dry_run {
            result.action = InjectAction::WouldEject;
            return Ok(result);
        }

        let new_content = remove_injection_block(&content);
        std::fs::write(&self.config.rc_file, new_content).map_err(|e| {
            SproutError::FileWriteFailed {
                path: result.rc_file.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(result)
    }

    /// Current shell integration state. A query, never a mutation.
    pub fn status(&self) -> Result<ShellStatus> {
        let mut status = ShellStatus {
            shell: self.config.shell.clone(),
            platform: self.config.platform.clone(),
            sprout_dir: self.config.sprout_dir.display().to_string(),
            sprout_dir_exists: self.config.sprout_dir.is_dir(),
            rc_file: self.config.rc_file.display().to_string(),
            injected: false,
            components: self.list_components(),
            generated_files: Vec::new(),
        };

        if status.sprout_dir_exists {
            let mut entries: Vec<String> = std::fs::read_dir(&self.config.sprout_dir)?
                .filter_map(std::result::Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| name.ends_with(".sh"))
                .collect();
            entries.sort();
            status.generated_files = entries;
        }

        if let Some(content) = read_rc_file(&self.config.rc_file)? {
            status.injected = content.contains(INJECT_MARKER_BEGIN);
        }

        Ok(status)
    }
}

/// Read the rc file; a missing file is `None`, other failures are errors.
fn read_rc_file(path: &std::path::Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SproutError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Drop everything between the markers inclusive, plus the single blank
/// line injection put before the opening marker.
fn remove_injection_block(content: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        if line.contains(INJECT_MARKER_BEGIN) {
            in_block = true;
            if kept.last().is_some_and(|l| l.is_empty()) {
                kept.pop();
            }
            continue;
        }
        if line.contains(INJECT_MARKER_END) {
            in_block = false;
            continue;
        }
        if !in_block {
            kept.push(line);
        }
    }

    let mut result = kept.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}
