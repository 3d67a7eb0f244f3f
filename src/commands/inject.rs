//! Inject command implementation

use console::Style;

use crate::cli::InjectArgs;
use crate::error::Result;
use crate::platform::Platform;
use crate::shell::{InjectAction, Manager, ShellConfig};

/// Run inject command
pub fn run(args: InjectArgs) -> Result<()> {
    let platform = Platform::detect();
    let manager = Manager::new(ShellConfig::new(&platform.os, args.dry_run));

    let result = manager.inject()?;
    match result.action {
        InjectAction::Injected => {
            println!(
                "{} sprout block added to {}",
                Style::new().green().apply_to("Injected:"),
                result.rc_file
            );
            println!("Restart your shell or run: source {}", result.rc_file);
        }
        InjectAction::AlreadyInjected => {
            println!("Already injected into {}", result.rc_file);
        }
        InjectAction::WouldInject => {
            println!("Would inject into {}:", result.rc_file);
            if let Some(block) = &result.block {
                print!("{block}");
            }
        }
        _ => {}
    }

    Ok(())
}
