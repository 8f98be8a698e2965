//! Command to list a project's environments.

use crate::error::CliError;
use crate::utils::{load_project, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::Args;
use stackform::BASE_ENVIRONMENT;
use std::path::PathBuf;

/// List a project's environments.
#[derive(Args)]
pub struct EnvsCommand {
    /// Project file to read
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,
}

impl EnvsCommand {
    /// Execute the envs command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let project = load_project(&self.project)?;

        let default = project
            .default_environment
            .as_deref()
            .unwrap_or(BASE_ENVIRONMENT);

        let marker = if default == BASE_ENVIRONMENT { "*" } else { " " };
        println!(
            "{marker} {BASE_ENVIRONMENT} ({} service(s), no overrides)",
            project.base_services.len()
        );

        for env in &project.environments {
            let marker = if env.name == default { "*" } else { " " };
            let profile = env
                .profile
                .as_deref()
                .map(|tag| format!(", profile {tag}"))
                .unwrap_or_default();
            println!(
                "{marker} {} ({} override(s){profile})",
                env.name,
                env.overrides.len()
            );
        }

        Ok(())
    }
}
