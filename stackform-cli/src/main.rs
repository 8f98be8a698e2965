//! Main entry point for the stackform CLI.
//!
//! This is the command-line interface for the stackform compose builder.
//! It provides commands for working with project files:
//! - `generate`: Render a compose document from a project file
//! - `import`: Turn an existing compose document into a project file
//! - `validate`: Check a project's service collection
//! - `graph`: Inspect the dependency graph
//! - `envs`: List environments
//! - `template`: Manage saved templates

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = stackform::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Generate(cmd) => cmd.execute(&global),
        cli::Command::Import(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Graph(cmd) => cmd.execute(&global),
        cli::Command::Envs(cmd) => cmd.execute(&global),
        cli::Command::Template(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
