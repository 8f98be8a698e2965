//! Dependency graph derived from a service collection.
//!
//! The graph is disposable: it is rebuilt on every structural change to
//! the collection and never mutated in place. Nodes carry layout
//! positions for diagramming; positions survive rebuilds by identity so
//! a user-arranged diagram is not destabilized when services are added.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Warning;
use crate::service::ServiceRecord;

/// Horizontal spacing between grid columns, in pixels.
const COLUMN_SPACING: f64 = 200.0;
/// Vertical spacing between grid rows, in pixels.
const ROW_SPACING: f64 = 150.0;
/// Offset of the first grid slot from the origin.
const GRID_MARGIN: f64 = 100.0;

/// A diagram position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// One service node in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Service name; doubles as the node identity across rebuilds.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Layout position.
    pub position: Position,
}

/// One depends-on relation, directed from dependent to dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// The dependent service.
    pub from: String,
    /// The service being depended on.
    pub to: String,
}

/// The derived node/edge structure for a service collection.
///
/// # Examples
///
/// ```
/// use stackform::{ComposeGraph, ServiceRecord};
///
/// let mut db = ServiceRecord::new("db", "postgres:13");
/// db.depends_on = vec!["web".to_string()];
/// let web = ServiceRecord::new("web", "nginx:alpine");
///
/// let graph = ComposeGraph::build(&[web, db]);
/// assert_eq!(graph.nodes().len(), 2);
/// assert_eq!(graph.edges()[0].from, "db");
/// assert_eq!(graph.edges()[0].to, "web");
/// ```
#[derive(Debug, Clone)]
pub struct ComposeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl ComposeGraph {
    /// Build a graph from scratch, assigning every node a grid position.
    ///
    /// Records with a blank name are skipped; blank dependency entries
    /// are ignored.
    #[must_use]
    pub fn build(records: &[ServiceRecord]) -> Self {
        Self::assemble(records, None)
    }

    /// Rebuild after a structural change, preserving the positions of
    /// nodes that already existed (matched by id). New nodes receive the
    /// next grid slot.
    #[must_use]
    pub fn rebuild(records: &[ServiceRecord], previous: &Self) -> Self {
        Self::assemble(records, Some(previous))
    }

    fn assemble(records: &[ServiceRecord], previous: Option<&Self>) -> Self {
        let named: Vec<&ServiceRecord> = records
            .iter()
            .filter(|record| !record.name.trim().is_empty())
            .collect();
        let total = named.len();

        let mut nodes = Vec::with_capacity(total);
        let mut edges = Vec::new();
        let mut graph = DiGraph::new();
        let mut indices = HashMap::with_capacity(total);

        for (index, record) in named.iter().enumerate() {
            let position = previous
                .and_then(|prev| prev.position_of(&record.name))
                .unwrap_or_else(|| grid_position(index, total));

            nodes.push(GraphNode {
                id: record.name.clone(),
                label: record.name.clone(),
                position,
            });

            let node_index = graph.add_node(record.name.clone());
            indices.insert(record.name.clone(), node_index);
        }

        for record in &named {
            for dep in &record.depends_on {
                let dep = dep.trim();
                if dep.is_empty() || dep == record.name {
                    continue;
                }

                edges.push(GraphEdge {
                    from: record.name.clone(),
                    to: dep.to_string(),
                });

                // Dangling references stay display-only; the algorithmic
                // graph needs both endpoints.
                if let (Some(&from), Some(&to)) =
                    (indices.get(&record.name), indices.get(dep))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self {
            nodes,
            edges,
            graph,
            indices,
        }
    }

    /// The diagram nodes, in record order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// The depends-on edges, in record order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// The position of a node, if present.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.position)
    }

    /// Whether the dependency relation contains any cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }

    /// Every simple cycle in the dependency relation, each reported
    /// exactly once as an ordered member list.
    ///
    /// Mutual pairs (two services depending on each other) are the common
    /// case and are detected by a dedicated pass; longer cycles come from
    /// a depth-first search anchored at each cycle's first node in record
    /// order.
    #[must_use]
    pub fn cycles(&self) -> Vec<Warning> {
        let mut cycles = Vec::new();

        // Pairwise mutual dependencies first.
        for a in self.graph.node_indices() {
            for b in self.graph.neighbors(a) {
                if b.index() > a.index() && self.graph.find_edge(b, a).is_some() {
                    cycles.push(Warning::Cycle {
                        members: vec![self.graph[a].clone(), self.graph[b].clone()],
                    });
                }
            }
        }

        // Longer cycles, anchored at their lowest-index member so each is
        // found exactly once.
        for start in self.graph.node_indices() {
            let mut path = vec![start];
            let mut on_path = vec![false; self.graph.node_count()];
            on_path[start.index()] = true;
            self.search_cycles(start, start, &mut path, &mut on_path, &mut cycles);
        }

        cycles
    }

    fn search_cycles(
        &self,
        start: NodeIndex,
        current: NodeIndex,
        path: &mut Vec<NodeIndex>,
        on_path: &mut Vec<bool>,
        cycles: &mut Vec<Warning>,
    ) {
        for next in self.graph.neighbors(current) {
            if next == start {
                // Length-2 cycles are handled by the mutual-pair pass.
                if path.len() >= 3 {
                    cycles.push(Warning::Cycle {
                        members: path.iter().map(|&idx| self.graph[idx].clone()).collect(),
                    });
                }
                continue;
            }

            if next.index() <= start.index() || on_path[next.index()] {
                continue;
            }

            path.push(next);
            on_path[next.index()] = true;
            self.search_cycles(start, next, path, on_path, cycles);
            on_path[next.index()] = false;
            path.pop();
        }
    }

    /// Dependency-first start order, or `None` when the relation is
    /// cyclic.
    #[must_use]
    pub fn start_order(&self) -> Option<Vec<String>> {
        let sorted = toposort(&self.graph, None).ok()?;
        // Edges run dependent -> dependency, so the topological order
        // lists dependents first; starting order is the reverse.
        Some(
            sorted
                .into_iter()
                .rev()
                .map(|idx| self.graph[idx].clone())
                .collect(),
        )
    }
}

/// Pure validator: cycles in a record collection's dependency relation.
///
/// # Examples
///
/// ```
/// use stackform::{detect_cycles, ServiceRecord};
///
/// let mut a = ServiceRecord::new("a", "img");
/// a.depends_on = vec!["b".to_string()];
/// let mut b = ServiceRecord::new("b", "img");
/// b.depends_on = vec!["a".to_string()];
///
/// let cycles = detect_cycles(&[a, b]);
/// assert_eq!(cycles.len(), 1);
/// ```
#[must_use]
pub fn detect_cycles(records: &[ServiceRecord]) -> Vec<Warning> {
    ComposeGraph::build(records).cycles()
}

/// Deterministic grid slot for node `index` of `total`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grid_position(index: usize, total: usize) -> Position {
    let cols = (total as f64).sqrt().ceil().max(1.0) as usize;
    let row = index / cols;
    let col = index % cols;

    Position {
        x: col as f64 * COLUMN_SPACING + GRID_MARGIN,
        y: row as f64 * ROW_SPACING + GRID_MARGIN,
    }
}
