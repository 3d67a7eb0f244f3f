//! Generate command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::GenerateArgs;
use crate::error::Result;
use crate::platform::Platform;

/// Run generate command
pub fn run(catalog: Option<PathBuf>, args: GenerateArgs) -> Result<()> {
    let catalog = super::open_catalog(catalog)?;
    let platform = Platform::detect();
    let manager = super::shell_manager(&catalog, &platform, args.dry_run)?;

    let result = if args.components.is_empty() {
        manager.generate_all()?
    } else {
        manager.generate_components(&args.components)?
    };

    let verb = if result.dry_run {
        "Would generate"
    } else {
        "Generated"
    };

    for script in &result.scripts {
        println!(
            "{} {}",
            Style::new().green().apply_to(verb),
            script.target
        );
    }
    for file in &result.config_files {
        println!(
            "{} {} {}",
            Style::new().green().apply_to(verb),
            file.target,
            Style::new().dim().apply_to(format!("({})", file.format))
        );
    }
    if let Some(entrypoint) = &result.entrypoint {
        println!(
            "{} {}",
            Style::new().green().apply_to(verb),
            entrypoint.target
        );
        if !result.dry_run {
            println!();
            println!("Run 'sprout inject' to source it from your shell rc file.");
        }
    }

    Ok(())
}
