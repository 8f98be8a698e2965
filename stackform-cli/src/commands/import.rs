//! Command to import a compose document into a project file.

use crate::error::CliError;
use crate::utils::{save_project, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::Args;
use stackform::{decode, ProjectConfig, Warning};
use std::fs;
use std::path::PathBuf;

/// Import a compose document into a new project file.
///
/// The input document is never modified; fields the record model does
/// not represent are reported so the original can be kept around for a
/// replace-vs-merge decision at re-export time.
#[derive(Args)]
pub struct ImportCommand {
    /// Compose document to import
    #[arg(value_name = "COMPOSE_PATH")]
    pub input: PathBuf,

    /// Project file to create
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Overwrite an existing project file
    #[arg(long)]
    pub force: bool,
}

impl ImportCommand {
    /// Execute the import command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.project.exists() && !self.force {
            return Err(CliError::InvalidArguments(format!(
                "{} already exists (use --force to overwrite)",
                self.project.display()
            )));
        }

        let contents = fs::read_to_string(&self.input)?;
        let result = decode(&contents).map_err(CliError::from)?;

        if !global.quiet {
            for warning in &result.warnings {
                eprintln!("WARN: {warning}");
                if matches!(warning, Warning::AdvancedFeatures { .. }) {
                    eprintln!(
                        "WARN: these fields are not carried into the project; keep {} if you need them",
                        self.input.display()
                    );
                }
            }
        }

        let project = ProjectConfig {
            base_services: result.records,
            ..Default::default()
        };
        save_project(&self.project, &project)?;

        if !global.quiet {
            eprintln!(
                "Imported {} service(s) into {}",
                project.base_services.len(),
                self.project.display()
            );
        }
        Ok(())
    }
}
