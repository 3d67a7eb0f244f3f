//! Sprout - declarative environment provisioning
//!
//! A command line tool that turns declarative component descriptions
//! (required tools, shell fragments, config files) into executable
//! installation plans, generated shell integration scripts and rendered
//! config files.

use clap::Parser;

mod catalog;
mod cli;
mod commands;
mod configfile;
mod error;
mod installer;
mod paths;
mod platform;
mod progress;
mod resolver;
mod shell;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.catalog, args, cli.verbose),
        Commands::Generate(args) => commands::generate::run(cli.catalog, args),
        Commands::Inject(args) => commands::inject::run(args),
        Commands::Eject(args) => commands::eject::run(args),
        Commands::Status(args) => commands::status::run(cli.catalog, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
