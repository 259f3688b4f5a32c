// Mermaid flowchart of the visible subgraph
//
// Nodes are keyed by id because labels (base names) are not unique.

use crate::analysis::{DependencyGraph, NodeId};
use std::collections::HashSet;

/// Diagram generator for creating Mermaid flowcharts
pub struct DiagramGenerator {
    /// Collapse parallel edges between the same pair of files
    collapse_duplicates: bool,
}

impl DiagramGenerator {
    /// Create a new diagram generator
    pub fn new() -> Self {
        Self {
            collapse_duplicates: true,
        }
    }

    /// Keep one arrow per import occurrence instead of one per file pair
    pub fn with_duplicates(mut self, keep: bool) -> Self {
        self.collapse_duplicates = !keep;
        self
    }

    /// Generate a top-down flowchart of visible nodes and edges
    pub fn generate(&self, graph: &DependencyGraph) -> String {
        let mut lines = vec!["graph TB".to_string()];
        let roots: HashSet<NodeId> = graph.roots().into_iter().collect();

        for node in graph.visible_nodes() {
            let style = root_style(roots.contains(&node.id));
            lines.push(format!(
                "    n{}[\"{}\"]{}",
                node.id.0,
                sanitize_label(&node.label),
                style
            ));
        }

        let mut seen = HashSet::new();
        for edge in graph.visible_edges() {
            if self.collapse_duplicates && !seen.insert((edge.source, edge.target)) {
                continue;
            }
            lines.push(format!("    n{} --> n{}", edge.source.0, edge.target.0));
        }

        lines.join("\n")
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Class suffix marking roots
fn root_style(is_root: bool) -> &'static str {
    if is_root {
        ":::root"
    } else {
        ""
    }
}

/// Mermaid labels are quoted; quotes inside become `#quot;`
fn sanitize_label(s: &str) -> String {
    s.replace('"', "#quot;")
}
