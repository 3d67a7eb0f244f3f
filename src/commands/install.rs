//! Install command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::InstallArgs;
use crate::error::{Result, SproutError};
use crate::installer::{Installer, ToolOutcome};
use crate::platform::Platform;
use crate::progress;
use crate::resolver::{InstallPlan, PlannedTool};

/// Run install command
pub fn run(catalog: Option<PathBuf>, args: InstallArgs, verbose: bool) -> Result<()> {
    let catalog = super::open_catalog(catalog)?;
    let platform = Platform::detect();
    let installer = Installer::new(catalog, platform, args.dry_run, verbose);

    let pb = progress::spinner(format!("Resolving {}", args.component));
    let plan = installer.plan(&args.component);
    pb.finish_and_clear();
    let plan = plan?;

    display_plan(&plan);

    if args.plan {
        return Ok(());
    }

    let pending = plan.pending();
    if pending.is_empty() {
        println!(
            "{}",
            Style::new()
                .green()
                .apply_to("All tools are already installed.")
        );
        return Ok(());
    }

    if !args.dry_run && !args.yes {
        let prompt = format!("Install {} tool(s)?", pending.len());
        if !inquire::Confirm::new(&prompt).with_default(true).prompt()? {
            return Ok(());
        }
    }

    let result = installer.execute(&plan);

    let (installed, skipped, failed) = result.summary();
    println!();
    println!(
        "{} {} installed, {} skipped, {} failed",
        Style::new().bold().apply_to("Done:"),
        installed,
        skipped,
        failed
    );

    for tool in &result.tools {
        if let ToolOutcome::Failed { error } = &tool.outcome {
            println!(
                "  {} {}: {}",
                Style::new().red().apply_to("✗"),
                tool.name,
                error
            );
        }
    }

    if !result.success {
        return Err(SproutError::InstallFailed {
            component: plan.component.clone(),
            failed,
        });
    }

    Ok(())
}

fn display_plan(plan: &InstallPlan) {
    println!(
        "{} {}",
        Style::new().bold().apply_to("Platform:"),
        plan.platform
    );
    println!(
        "{} {}",
        Style::new().bold().apply_to("Component:"),
        Style::new().yellow().apply_to(&plan.component)
    );

    if !plan.prerequisites.is_empty() {
        println!("{}", Style::new().bold().apply_to("Prerequisites:"));
        for tool in &plan.prerequisites {
            display_tool(tool);
        }
    }

    println!("{}", Style::new().bold().apply_to("Tools:"));
    for tool in &plan.tools {
        display_tool(tool);
    }
}

fn display_tool(tool: &PlannedTool) {
    if tool.already_installed {
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
        let via = tool
            .method
            .as_ref()
            .map(|m| format!(" via {}", m.kind))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            Style::new().cyan().apply_to("→"),
            tool.name,
            Style::new().dim().apply_to(via)
        );
    }
}
