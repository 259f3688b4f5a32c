// Depth assignment for progressive disclosure
//
// Roots (no incoming edge) sit at depth 1. Depths spread along edges with a
// FIFO worklist and a best-known-depth table, overwriting only when a
// strictly smaller depth is found, so the result is the minimum distance
// from any root and cycles terminate.
//
// Order: roots by ascending id, successors in edge list order. The order
// breaks ties during propagation but never changes the final values.

use crate::analysis::graph::{DependencyGraph, NodeId, DEFAULT_DEPTH};
use std::collections::VecDeque;

/// Result of a depth pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthMap {
    /// Depth per node id; `None` where no root reaches the node
    pub depths: Vec<Option<u32>>,
    /// Largest effective depth, counting unreached nodes at the default
    pub max_depth: u32,
}

impl DepthMap {
    pub fn get(&self, id: NodeId) -> Option<u32> {
        self.depths.get(id.0).copied().flatten()
    }

    /// Nodes that no root reaches
    pub fn unreached(&self) -> Vec<NodeId> {
        self.depths
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_none())
            .map(|(i, _)| NodeId(i))
            .collect()
    }
}

/// Compute minimum depths without touching the graph
pub fn compute_depths(graph: &DependencyGraph) -> DepthMap {
    let count = graph.node_count();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
    for edge in &graph.edges {
        if edge.source.0 < count && edge.target.0 < count {
            successors[edge.source.0].push(edge.target.0);
        }
    }

    let mut depths: Vec<Option<u32>> = vec![None; count];
    let mut worklist = VecDeque::new();

    for root in graph.roots() {
        if depths[root.0].map_or(true, |d| 1 < d) {
            depths[root.0] = Some(1);
            worklist.push_back(root.0);
        }

        while let Some(current) = worklist.pop_front() {
            let Some(depth) = depths[current] else {
                continue;
            };
            let proposed = depth + 1;
            for &next in &successors[current] {
                if depths[next].map_or(true, |d| proposed < d) {
                    depths[next] = Some(proposed);
                    worklist.push_back(next);
                }
            }
        }
    }

    let max_depth = depths
        .iter()
        .map(|d| d.unwrap_or(DEFAULT_DEPTH))
        .max()
        .unwrap_or(0);

    DepthMap { depths, max_depth }
}

impl DependencyGraph {
    /// Compute depths and store them on the nodes; returns the max depth
    pub fn assign_depths(&mut self) -> u32 {
        let map = compute_depths(self);
        for node in &mut self.nodes {
            node.depth = map.get(node.id);
        }
        let unreached = map.unreached();
        if !unreached.is_empty() {
            tracing::debug!(
                "{} nodes unreachable from any root, shown at depth {}",
                unreached.len(),
                DEFAULT_DEPTH
            );
        }
        map.max_depth
    }

    /// Max effective depth of the current nodes; 0 for an empty graph
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.effective_depth()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::graph::{Edge, Node};

    fn graph(count: usize, edges: &[(usize, usize)]) -> DependencyGraph {
        let nodes = (0..count)
            .map(|i| Node::new(NodeId(i), format!("{}.js", i), format!("{}.js", i)))
            .collect();
        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, &(s, t))| Edge::new(NodeId(s), NodeId(t), i))
            .collect();
        DependencyGraph { nodes, edges }
    }

    #[test]
    fn test_two_node_chain() {
        let map = compute_depths(&graph(2, &[(0, 1)]));
        assert_eq!(map.depths, vec![Some(1), Some(2)]);
        assert_eq!(map.max_depth, 2);
    }

    #[test]
    fn test_minimum_over_paths() {
        // 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3
        let map = compute_depths(&graph(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]));
        assert_eq!(map.depths, vec![Some(1), Some(2), Some(3), Some(2)]);
        assert_eq!(map.max_depth, 3);
    }

    #[test]
    fn test_minimum_over_roots() {
        // Root 0 reaches 3 in three hops, root 4 in one
        let map = compute_depths(&graph(5, &[(0, 1), (1, 2), (2, 3), (4, 3)]));
        assert_eq!(map.get(NodeId(3)), Some(2));
        assert_eq!(map.get(NodeId(4)), Some(1));
    }

    #[test]
    fn test_pure_cycle_has_no_depth() {
        let map = compute_depths(&graph(2, &[(0, 1), (1, 0)]));
        assert_eq!(map.depths, vec![None, None]);
        assert_eq!(map.unreached(), vec![NodeId(0), NodeId(1)]);
        // Unreached nodes count at the default depth
        assert_eq!(map.max_depth, DEFAULT_DEPTH);
    }

    #[test]
    fn test_cycle_below_a_root_terminates() {
        let map = compute_depths(&graph(3, &[(0, 1), (1, 2), (2, 1)]));
        assert_eq!(map.depths, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_empty_graph() {
        let map = compute_depths(&DependencyGraph::new());
        assert!(map.depths.is_empty());
        assert_eq!(map.max_depth, 0);
    }

    #[test]
    fn test_depth_bound_along_edges() {
        let g = graph(
            6,
            &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 1), (5, 4)],
        );
        let map = compute_depths(&g);
        for edge in &g.edges {
            if let (Some(s), Some(t)) = (map.get(edge.source), map.get(edge.target)) {
                assert!(t <= s + 1, "edge {:?} violates depth bound", edge);
            }
        }
        // Every reached non-root has an in-edge that is tight
        let roots = g.roots();
        for node in &g.nodes {
            let Some(depth) = map.get(node.id) else { continue };
            if roots.contains(&node.id) {
                continue;
            }
            assert!(g
                .edges
                .iter()
                .filter(|e| e.target == node.id)
                .any(|e| map.get(e.source).map(|s| s + 1) == Some(depth)));
        }
    }

    #[test]
    fn test_assign_depths_stores_on_nodes() {
        let mut g = graph(3, &[(0, 1), (1, 2)]);
        let max = g.assign_depths();
        assert_eq!(max, 3);
        assert_eq!(g.max_depth(), 3);
        let depths: Vec<Option<u32>> = g.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_assign_depths_cycle_uses_fallback() {
        let mut g = graph(2, &[(0, 1), (1, 0)]);
        assert_eq!(g.assign_depths(), 1);
        assert!(g.nodes.iter().all(|n| n.depth.is_none()));
        assert!(g.nodes.iter().all(|n| n.effective_depth() == 1));
    }
}
