//! Eject command implementation

use console::Style;

use crate::cli::EjectArgs;
use crate::error::Result;
use crate::platform::Platform;
use crate::shell::{InjectAction, Manager, ShellConfig};

/// Run eject command
pub fn run(args: EjectArgs) -> Result<()> {
    let platform = Platform::detect();
    let manager = Manager::new(ShellConfig::new(&platform.os, args.dry_run));

    if !args.dry_run && !args.yes {
        let prompt = "Remove the sprout block from your shell rc file?";
        if !inquire::Confirm::new(prompt).with_default(false).prompt()? {
            return Ok(());
        }
    }

    let result = manager.eject()?;
    match result.action {
        InjectAction::Ejected => {
            println!(
                "{} sprout block removed from {}",
                Style::new().green().apply_to("Ejected:"),
                result.rc_file
            );
        }
        InjectAction::NotInjected => {
            println!("No sprout block found in {}", result.rc_file);
        }
        InjectAction::WouldEject => {
            println!("Would remove the sprout block from {}", result.rc_file);
        }
        _ => {}
    }

    Ok(())
}
