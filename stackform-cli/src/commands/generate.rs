//! Command to generate a compose document from a project file.

use crate::error::CliError;
use crate::utils::{load_project, resolve_environment, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::Args;
use stackform::codec::{encode, encode_preview};
use std::fs;
use std::path::PathBuf;

/// Generate a compose document from a project file.
#[derive(Args)]
pub struct GenerateCommand {
    /// Project file to read
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Environment to resolve before generating
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Preview mode: skip invalid services instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Write the document here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let project = load_project(&self.project)?;
        let (records, profile) = resolve_environment(&project, self.env.as_deref())?;

        let yaml = if self.lenient {
            let result = encode_preview(&records, profile.as_deref())?;
            if !global.quiet {
                for warning in &result.warnings {
                    eprintln!("WARN: {warning}");
                }
            }
            result.yaml
        } else {
            encode(&records, profile.as_deref())?
        };

        match self.output {
            Some(path) => {
                fs::write(&path, &yaml)?;
                if !global.quiet {
                    eprintln!("Wrote {}", path.display());
                }
            }
            None => print!("{yaml}"),
        }

        Ok(())
    }
}
