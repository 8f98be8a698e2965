//! Build script for stackform-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release
//! builds.
//!
//! Note: We build a minimal command structure here rather than importing
//! from the main crate, since build scripts cannot depend on the crate
//! being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("stackform")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and round-trip compose configurations")
        .long_about(
            "Command-line tool for building multi-service compose configurations from project files",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("STACKFORM_DATA_DIR"),
        )
        .subcommands(vec![
            Command::new("generate")
                .about("Generate a compose document from a project file")
                .long_about("Render a project's service collection, optionally through an environment overlay"),
            Command::new("import")
                .about("Import a compose document into a new project file")
                .long_about("Decode an existing compose document into a project file, reporting unmodeled fields"),
            Command::new("validate")
                .about("Validate a project's service collection")
                .long_about("Check names, ports, duplicates, dependencies, and cycles"),
            Command::new("graph")
                .about("Show the dependency graph, cycles, and start order")
                .long_about("Display the derived service graph with layout positions"),
            Command::new("envs")
                .about("List a project's environments")
                .long_about("List environments with their override footprints"),
            Command::new("template")
                .about("Manage saved templates")
                .long_about("List, save, apply, and delete reusable service-collection templates"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    // Generate main stackform.1 man page
    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("stackform.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
