// Depth threshold filtering
//
// Only node `hidden` flags are written; edge visibility is always derived
// from the endpoints (see `DependencyGraph::is_edge_hidden`).

use crate::analysis::graph::DependencyGraph;

impl DependencyGraph {
    /// Hide every node deeper than `threshold` and reveal the rest.
    ///
    /// Depths are left untouched and no state from earlier calls is kept,
    /// so repeated calls with the same threshold agree.
    pub fn apply_threshold(&mut self, threshold: u32) {
        for node in &mut self.nodes {
            node.hidden = node.effective_depth() > threshold;
        }
    }

    /// Reveal every node
    pub fn show_all(&mut self) {
        for node in &mut self.nodes {
            node.hidden = false;
        }
    }
}
