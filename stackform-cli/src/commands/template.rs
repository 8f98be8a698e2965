//! Commands for managing saved templates.

use crate::error::CliError;
use crate::utils::{load_project, open_store, save_project, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::{Args, Subcommand};
use stackform::template::{Template, TemplateStore};
use stackform::ProjectConfig;
use std::path::PathBuf;

/// Manage saved templates.
#[derive(Subcommand)]
pub enum TemplateCommand {
    /// List saved templates, most recently updated first
    List(TemplateListCommand),

    /// Save a project's base services as a template
    Save(TemplateSaveCommand),

    /// Create a project file from a saved template
    Apply(TemplateApplyCommand),

    /// Delete a saved template
    Delete(TemplateDeleteCommand),
}

impl TemplateCommand {
    /// Execute the selected template subcommand.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            Self::List(cmd) => cmd.execute(global),
            Self::Save(cmd) => cmd.execute(global),
            Self::Apply(cmd) => cmd.execute(global),
            Self::Delete(cmd) => cmd.execute(global),
        }
    }
}

/// List saved templates.
#[derive(Args)]
pub struct TemplateListCommand {}

impl TemplateListCommand {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let store = TemplateStore::new(open_store(global)?);
        let metadata = store.metadata()?;

        if metadata.is_empty() {
            println!("No templates saved");
            return Ok(());
        }

        for entry in metadata {
            println!(
                "{}  {} ({} service(s), used {}x)",
                entry.id, entry.name, entry.service_count, entry.usage_count
            );
        }
        Ok(())
    }
}

/// Save a project's base services as a template.
#[derive(Args)]
pub struct TemplateSaveCommand {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Project file to read
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Description shown in listings
    #[arg(long, default_value = "")]
    pub description: String,
}

impl TemplateSaveCommand {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let project = load_project(&self.project)?;
        if project.base_services.is_empty() {
            return Err(CliError::SemanticFailure(
                "Project has no services to save".to_string(),
            ));
        }

        let mut template = Template::new(self.name, project.base_services);
        template.description = self.description;

        let mut store = TemplateStore::new(open_store(global)?);
        let id = store.save(template)?;
        println!("{id}");
        Ok(())
    }
}

/// Create a project file from a saved template.
#[derive(Args)]
pub struct TemplateApplyCommand {
    /// Template id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Project file to create
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Overwrite an existing project file
    #[arg(long)]
    pub force: bool,
}

impl TemplateApplyCommand {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.project.exists() && !self.force {
            return Err(CliError::InvalidArguments(format!(
                "{} already exists (use --force to overwrite)",
                self.project.display()
            )));
        }

        let mut store = TemplateStore::new(open_store(global)?);
        let template = store.get(&self.id)?.ok_or_else(|| {
            CliError::SemanticFailure(format!("No template with id {}", self.id))
        })?;

        let project = ProjectConfig {
            base_services: template.services,
            ..Default::default()
        };
        save_project(&self.project, &project)?;
        store.record_usage(&self.id)?;

        if !global.quiet {
            eprintln!("Created {} from template", self.project.display());
        }
        Ok(())
    }
}

/// Delete a saved template.
#[derive(Args)]
pub struct TemplateDeleteCommand {
    /// Template id
    #[arg(value_name = "ID")]
    pub id: String,
}

impl TemplateDeleteCommand {
    fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut store = TemplateStore::new(open_store(global)?);
        if store.delete(&self.id)? {
            println!("Deleted {}", self.id);
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "No template with id {}",
                self.id
            )))
        }
    }
}
