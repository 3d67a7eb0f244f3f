//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sprout - declarative environment provisioning
///
/// Provision developer machines from declarative component descriptions:
/// resolve and install required tools, generate shell integration scripts,
/// and render typed config files.
#[derive(Parser, Debug)]
#[command(
    name = "sprout",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Declarative environment provisioning for developer machines",
    long_about = "Sprout turns declarative component descriptions (tools, shell fragments, \
                  config files) into executable installation plans, generated shell \
                  integration scripts and rendered config files, in a reproducible manner.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  sprout install git\n    \
                  sprout install tmux --plan\n    \
                  sprout generate\n    \
                  sprout inject\n    \
                  sprout status"
)]
pub struct Cli {
    /// Component catalog directory (defaults to $XDG_CONFIG_HOME/sprout/catalog)
    #[arg(long, short = 'c', global = true, env = "SPROUT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the tools a component declares
    Install(InstallArgs),

    /// Generate shell integration scripts and config files
    Generate(GenerateArgs),

    /// Add the sprout source block to your shell rc file
    Inject(InjectArgs),

    /// Remove the sprout source block from your shell rc file
    Eject(EjectArgs),

    /// Show platform, tool and shell integration status
    Status(StatusArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a component's tools:\n    sprout install git\n\n\
                  Show the plan without installing:\n    sprout install git --plan\n\n\
                  Preview the would-be commands:\n    sprout install git --dry-run\n\n\
                  Skip the confirmation prompt:\n    sprout install git --yes")]
pub struct InstallArgs {
    /// Component name from the catalog
    pub component: String,

    /// Print the installation plan and exit
    #[arg(long)]
    pub plan: bool,

    /// Print would-be commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate everything (scripts + entrypoint):\n    sprout generate\n\n\
                  Generate specific components:\n    sprout generate git tmux\n\n\
                  Preview without writing:\n    sprout generate --dry-run")]
pub struct GenerateArgs {
    /// Components to generate (all registered components when omitted)
    pub components: Vec<String>,

    /// Render without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the inject command
#[derive(Parser, Debug)]
pub struct InjectArgs {
    /// Show the would-be change without touching the rc file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the eject command
#[derive(Parser, Debug)]
pub struct EjectArgs {
    /// Show the would-be change without touching the rc file
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON instead of the human summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    sprout completions --shell bash > ~/.bash_completion.d/sprout\n\n\
                  Generate zsh completions:\n    sprout completions --shell zsh > ~/.zfunc/_sprout")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
