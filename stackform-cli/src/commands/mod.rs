//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `generate`: Render a compose document from a project file
//! - `import`: Turn an existing compose document into a project file
//! - `validate`: Check a project's service collection
//! - `graph`: Show nodes, edges, cycles, and start order
//! - `envs`: List a project's environments
//! - `template`: Manage saved templates
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod envs;
pub mod generate;
pub mod graph;
pub mod import;
pub mod template;
pub mod validate;

pub use completions::CompletionsCommand;
pub use envs::EnvsCommand;
pub use generate::GenerateCommand;
pub use graph::GraphCommand;
pub use import::ImportCommand;
pub use template::TemplateCommand;
pub use validate::ValidateCommand;
