//! Command to inspect the dependency graph.

use crate::error::CliError;
use crate::utils::{load_project, resolve_environment, GlobalOptions, DEFAULT_PROJECT_FILE};
use clap::Args;
use serde::Serialize;
use stackform::{ComposeGraph, GraphEdge, GraphNode, Warning};
use std::path::PathBuf;

/// Show the dependency graph, cycles, and start order.
#[derive(Args)]
pub struct GraphCommand {
    /// Project file to read
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROJECT_FILE)]
    pub project: PathBuf,

    /// Graph the effective records for this environment
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// JSON payload for `graph --json`.
#[derive(Serialize)]
struct GraphReport<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    cycles: Vec<Vec<String>>,
    start_order: Option<Vec<String>>,
}

impl GraphCommand {
    /// Execute the graph command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let project = load_project(&self.project)?;
        let (records, _) = resolve_environment(&project, self.env.as_deref())?;

        let graph = ComposeGraph::build(&records);
        let cycles: Vec<Vec<String>> = graph
            .cycles()
            .into_iter()
            .filter_map(|warning| match warning {
                Warning::Cycle { members } => Some(members),
                _ => None,
            })
            .collect();
        let start_order = graph.start_order();

        if self.json {
            let report = GraphReport {
                nodes: graph.nodes(),
                edges: graph.edges(),
                cycles,
                start_order,
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::SemanticFailure(format!("Cannot serialize graph: {e}")))?;
            println!("{json}");
            return Ok(());
        }

        println!("Services ({}):", graph.nodes().len());
        for node in graph.nodes() {
            println!(
                "  {} at ({}, {})",
                node.id, node.position.x, node.position.y
            );
        }

        println!("Dependencies ({}):", graph.edges().len());
        for edge in graph.edges() {
            println!("  {} -> {}", edge.from, edge.to);
        }

        if cycles.is_empty() {
            match start_order {
                Some(order) => println!("Start order: {}", order.join(", ")),
                None => println!("Start order: unavailable"),
            }
        } else {
            for members in &cycles {
                eprintln!("WARN: dependency cycle: {}", members.join(" -> "));
            }
            println!("Start order: unavailable (cycles present)");
        }

        Ok(())
    }
}
