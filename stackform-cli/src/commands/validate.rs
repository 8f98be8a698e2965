//! Command to validate a project's service collection.

use crate::error::CliError;
use crate::utils::{load_project, resolve_environment, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::Args;
use stackform::{detect_cycles, CollectionValidator};
use std::path::PathBuf;

/// Validate a project's service collection.
#[derive(Args)]
pub struct ValidateCommand {
    /// Project file to validate
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Validate the effective records for this environment
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let project = load_project(&self.project)?;
        let (records, _) = resolve_environment(&project, self.env.as_deref())?;

        let mut warnings = match CollectionValidator::validate_collection(&records) {
            Ok(warnings) => warnings,
            Err(e) => {
                eprintln!("Validation error: {e}");
                return Err(CliError::SemanticFailure(
                    "Service collection is invalid".to_string(),
                ));
            }
        };
        warnings.extend(detect_cycles(&records));

        if !global.quiet {
            for warning in &warnings {
                eprintln!("WARN: {warning}");
            }
        }

        println!(
            "Collection is valid ({} service(s), {} warning(s))",
            records.len(),
            warnings.len()
        );
        Ok(())
    }
}
