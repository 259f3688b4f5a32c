// Dependency graph of source files
//
// Node ids are dense indices into `nodes` and are only meaningful within one
// snapshot; they change whenever the graph is rebuilt.

use crate::parser::record::directory_of;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dense identifier of a node within the current graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Depth assumed for nodes no root reaches
pub const DEFAULT_DEPTH: u32 = 1;

/// Axis-aligned rectangle in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Midpoint of the top side
    pub fn top_center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y)
    }

    /// Midpoint of the bottom side
    pub fn bottom_center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.bottom())
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A source file in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Base name of the file
    pub label: String,
    /// Path relative to the scanned root
    pub path: String,
    /// Minimum distance from a root, once computed
    pub depth: Option<u32>,
    pub hidden: bool,
    /// Placement supplied by the layout collaborator
    pub position: Option<Rect>,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            path: path.into(),
            depth: None,
            hidden: false,
            position: None,
        }
    }

    /// Depth used for display, falling back for nodes no root reached
    pub fn effective_depth(&self) -> u32 {
        self.depth.unwrap_or(DEFAULT_DEPTH)
    }
}

/// An import relationship; one per resolved import occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Position of the producing specifier in the source file's import list
    pub ordinal: usize,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, ordinal: usize) -> Self {
        Self {
            source,
            target,
            ordinal,
        }
    }

    /// Stable textual id within one snapshot
    pub fn id(&self) -> String {
        format!("e{}-{}-{}", self.source.0, self.target.0, self.ordinal)
    }
}

/// Files living directly in one directory; a layout hint only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryGroup {
    pub directory: String,
    pub nodes: Vec<NodeId>,
}

/// The node/edge set produced by the graph builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by its path
    pub fn node_by_path(&self, path: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.path == path)
    }

    /// Drop nodes that are in no edge and renumber the survivors.
    ///
    /// Survivors keep their relative order and get ids `0..n`. Edges are
    /// rewritten through the old-to-new mapping; an edge whose endpoint did
    /// not survive is dropped. Applying this to an already pruned graph
    /// returns it unchanged.
    pub fn prune(self) -> Self {
        let mut connected = vec![false; self.nodes.len()];
        for edge in &self.edges {
            if let Some(flag) = connected.get_mut(edge.source.0) {
                *flag = true;
            }
            if let Some(flag) = connected.get_mut(edge.target.0) {
                *flag = true;
            }
        }

        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
        let mut nodes = Vec::new();
        for node in self.nodes {
            if !connected.get(node.id.0).copied().unwrap_or(false) {
                continue;
            }
            let new_id = NodeId(nodes.len());
            remap.insert(node.id, new_id);
            nodes.push(Node { id: new_id, ..node });
        }

        let edges = self
            .edges
            .into_iter()
            .filter_map(|edge| {
                let source = *remap.get(&edge.source)?;
                let target = *remap.get(&edge.target)?;
                Some(Edge::new(source, target, edge.ordinal))
            })
            .collect();

        Self { nodes, edges }
    }

    /// Nodes with no incoming edge, in id order
    pub fn roots(&self) -> Vec<NodeId> {
        let mut has_incoming = vec![false; self.nodes.len()];
        for edge in &self.edges {
            if let Some(flag) = has_incoming.get_mut(edge.target.0) {
                *flag = true;
            }
        }
        self.nodes
            .iter()
            .filter(|n| !has_incoming[n.id.0])
            .map(|n| n.id)
            .collect()
    }

    /// Files that `id` imports, in edge order (duplicates kept)
    pub fn imports_of(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target)
            .collect()
    }

    /// Files that import `id`, in edge order (duplicates kept)
    pub fn imported_by(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.source)
            .collect()
    }

    /// An edge is hidden whenever either endpoint is
    pub fn is_edge_hidden(&self, edge: &Edge) -> bool {
        let hidden = |id: NodeId| self.node(id).map_or(true, |n| n.hidden);
        hidden(edge.source) || hidden(edge.target)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.hidden)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !self.is_edge_hidden(e))
    }

    /// Group node ids by the directory their file lives in
    pub fn directory_groups(&self) -> Vec<DirectoryGroup> {
        let mut groups: BTreeMap<&str, Vec<NodeId>> = BTreeMap::new();
        for node in &self.nodes {
            groups.entry(directory_of(&node.path)).or_default().push(node.id);
        }
        groups
            .into_iter()
            .map(|(directory, nodes)| DirectoryGroup {
                directory: directory.to_string(),
                nodes,
            })
            .collect()
    }

    /// Import cycles: strongly connected components with more than one node
    pub fn cycles(&self) -> Vec<Vec<NodeId>> {
        let mut graph: DiGraph<NodeId, ()> = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<_> = self.nodes.iter().map(|n| graph.add_node(n.id)).collect();
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (indices.get(edge.source.0), indices.get(edge.target.0)) {
                graph.add_edge(from, to, ());
            }
        }

        let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<NodeId> = component.into_iter().map(|ix| graph[ix]).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Copy layout rectangles onto nodes; nodes absent from `positions` lose
    /// any previous placement.
    pub fn apply_positions(&mut self, positions: &HashMap<NodeId, Rect>) {
        for node in &mut self.nodes {
            node.position = positions.get(&node.id).copied();
        }
    }

    /// Summary counts for reporting
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            visible_nodes: self.visible_nodes().count(),
            visible_edges: self.visible_edges().count(),
            roots: self.roots().len(),
            cycles: self.cycles().len(),
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub visible_nodes: usize,
    pub visible_edges: usize,
    pub roots: usize,
    pub cycles: usize,
}
