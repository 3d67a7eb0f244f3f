//! Status command implementation
//!
//! A read-only query: current platform, per-tool install state across the
//! catalog, registered components, generated files and rc-file injection
//! state. Never mutates anything.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::error::Result;
use crate::platform::Platform;
use crate::progress;
use crate::resolver::check_installed;
use crate::shell::ShellStatus;

/// Install state of one declared tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub component: String,
    pub name: String,
    pub installed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Full status report.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub platform: Platform,
    pub catalog: String,
    pub shell: ShellStatus,
    pub tools: Vec<ToolStatus>,
}

/// Run status command
pub fn run(catalog: Option<PathBuf>, args: StatusArgs) -> Result<()> {
    let catalog = super::open_catalog(catalog)?;
    let platform = Platform::detect();
    let manager = super::shell_manager(&catalog, &platform, true)?;

    let pb = progress::spinner("Checking tools");
    let mut tools = Vec::new();
    for component in catalog.component_names() {
        for tool in catalog.tool_requirements(&component)? {
            pb.set_message(format!("Checking {}", tool.name));
            let (installed, version) = check_installed(&tool.check);
            tools.push(ToolStatus {
                component: component.clone(),
                name: tool.name,
                installed,
                version,
            });
        }
    }
    pb.finish_and_clear();

    let report = StatusReport {
        platform,
        catalog: catalog.dir().display().to_string(),
        shell: manager.status()?,
        tools,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display_report(&report);
    Ok(())
}

fn display_report(report: &StatusReport) {
    let bold = Style::new().bold();

    println!("{} {}", bold.apply_to("Platform:"), report.platform);
    println!("{} {}", bold.apply_to("Catalog:"), report.catalog);
    println!("{} {}", bold.apply_to("Shell:"), report.shell.shell);
    println!(
        "{} {} {}",
        bold.apply_to("Sprout dir:"),
        report.shell.sprout_dir,
        if report.shell.sprout_dir_exists {
            Style::new().green().apply_to("(exists)")
        } else {
            Style::new().dim().apply_to("(missing)")
        }
    );
    println!(
        "{} {} {}",
        bold.apply_to("RC file:"),
        report.shell.rc_file,
        if report.shell.injected {
            Style::new().green().apply_to("(injected)")
        } else {
            Style::new().dim().apply_to("(not injected)")
        }
    );

    println!(
        "{} {}",
        bold.apply_to("Components:"),
        report.shell.components.join(", ")
    );

    if !report.shell.generated_files.is_empty() {
        println!(
            "{} {}",
            bold.apply_to("Generated:"),
            report.shell.generated_files.join(", ")
        );
    }

    if !report.tools.is_empty() {
        println!("{}", bold.apply_to("Tools:"));
        for tool in &report.tools {
            if tool.installed {
                let version = tool
                    .version
                    .as_deref()
                    .map(|v| format!(" ({v})"))
                    .unwrap_or_default();
                println!(
                    "  {} {}{}",
                    Style::new().green().apply_to("✓"),
                    tool.name,
                    Style::new().dim().apply_to(version)
                );
            } else {
                println!(
                    "  {} {} {}",
                    Style::new().red().apply_to("✗"),
                    tool.name,
                    Style::new()
                        .dim()
                        .apply_to(format!("(sprout install {})", tool.component))
                );
            }
        }
    }
}
