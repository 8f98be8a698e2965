//! Utility functions for CLI operations.
//!
//! Project-file IO and store wiring shared across commands.

use crate::error::CliError;
use stackform::store::FileStore;
use stackform::{ProjectConfig, ServiceRecord, BASE_ENVIRONMENT};
use std::fs;
use std::path::{Path, PathBuf};

/// Default project file name in the working directory.
pub const DEFAULT_PROJECT_FILE: &str = "stackform.json";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,
}

/// Open the key-value store backing templates and saved environments.
pub fn open_store(global: &GlobalOptions) -> Result<FileStore, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(FileStore::new(dir.clone())),
        None => FileStore::open_default().map_err(CliError::from),
    }
}

/// Load a project file.
pub fn load_project(path: &Path) -> Result<ProjectConfig, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "Project file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)?;
    let project = serde_json::from_str(&contents).map_err(|e| {
        CliError::SemanticFailure(format!("Invalid project file {}: {e}", path.display()))
    })?;
    Ok(project)
}

/// Write a project file as pretty-printed JSON.
pub fn save_project(path: &Path, project: &ProjectConfig) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(project)
        .map_err(|e| CliError::SemanticFailure(format!("Cannot serialize project: {e}")))?;
    fs::write(path, json + "\n")?;
    Ok(())
}

/// Resolve the effective record list and profile tag for an environment
/// selection, defaulting to the project's default environment and
/// falling back to the base collection.
pub fn resolve_environment(
    project: &ProjectConfig,
    requested: Option<&str>,
) -> Result<(Vec<ServiceRecord>, Option<String>), CliError> {
    let name = requested
        .or(project.default_environment.as_deref())
        .unwrap_or(BASE_ENVIRONMENT);

    let records = project.resolve(name).map_err(CliError::from)?;
    let profile = project
        .environment(name)
        .and_then(|env| env.profile.clone());
    Ok((records, profile))
}
