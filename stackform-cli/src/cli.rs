//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, EnvsCommand, GenerateCommand, GraphCommand, ImportCommand,
    TemplateCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for building multi-service compose configurations.
#[derive(Parser)]
#[command(name = "stackform")]
#[command(version, about = "Build and round-trip compose configurations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "STACKFORM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a compose document from a project file
    Generate(GenerateCommand),

    /// Import a compose document into a new project file
    Import(ImportCommand),

    /// Validate a project's service collection
    Validate(ValidateCommand),

    /// Show the dependency graph, cycles, and start order
    Graph(GraphCommand),

    /// List a project's environments
    Envs(EnvsCommand),

    /// Manage saved templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
