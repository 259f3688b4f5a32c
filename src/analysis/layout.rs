// Layout collaborator interface and a minimal layered implementation
//
// Positions are rectangles in a top-to-bottom coordinate space. Any engine
// producing them can stand in for `LayeredLayout`.

use crate::analysis::graph::{DependencyGraph, DirectoryGroup, NodeId, Rect};
use crate::config::LayoutConfig;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};

/// Node placement keyed by node id
pub type Positions = HashMap<NodeId, Rect>;

/// Assigns a rectangle to every node of a graph
pub trait Layout {
    fn layout(&self, graph: &DependencyGraph, groups: &[DirectoryGroup]) -> Result<Positions>;
}

/// Rank grid: one row per depth, nodes of a row ordered by directory group
/// and then by id, each row centered on the widest one.
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    node_width: f64,
    node_height: f64,
    node_sep: f64,
    rank_sep: f64,
}

impl LayeredLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            node_width: config.node_width,
            node_height: config.node_height,
            node_sep: config.node_sep,
            rank_sep: config.rank_sep,
        }
    }
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl Layout for LayeredLayout {
    fn layout(&self, graph: &DependencyGraph, groups: &[DirectoryGroup]) -> Result<Positions> {
        let group_rank: HashMap<NodeId, usize> = groups
            .iter()
            .enumerate()
            .flat_map(|(rank, group)| group.nodes.iter().map(move |id| (*id, rank)))
            .collect();

        let mut rows: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
        for node in &graph.nodes {
            rows.entry(node.effective_depth()).or_default().push(node.id);
        }
        for row in rows.values_mut() {
            row.sort_by_key(|id| (group_rank.get(id).copied().unwrap_or(usize::MAX), *id));
        }

        let row_width = |len: usize| {
            len as f64 * self.node_width + len.saturating_sub(1) as f64 * self.node_sep
        };
        let widest = rows.values().map(|r| row_width(r.len())).fold(0.0, f64::max);

        let mut positions = Positions::with_capacity(graph.node_count());
        for (rank, row) in rows.values().enumerate() {
            let offset = (widest - row_width(row.len())) / 2.0;
            let y = rank as f64 * (self.node_height + self.rank_sep);
            for (slot, id) in row.iter().enumerate() {
                let x = offset + slot as f64 * (self.node_width + self.node_sep);
                positions.insert(*id, Rect::new(x, y, self.node_width, self.node_height));
            }
        }

        Ok(positions)
    }
}
