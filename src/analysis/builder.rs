// Graph construction from extraction records

use crate::analysis::graph::{DependencyGraph, Edge, Node, NodeId};
use crate::analysis::resolver::SpecifierResolver;
use crate::parser::FileRecord;

/// Turns file records into a pruned dependency graph
pub struct GraphBuilder<'a> {
    resolver: &'a dyn SpecifierResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: &'a dyn SpecifierResolver) -> Self {
        Self { resolver }
    }

    /// Link records and prune nodes that ended up in no edge.
    ///
    /// Same record order in, same ids and edges out.
    pub fn build(&self, records: &[FileRecord]) -> DependencyGraph {
        let linked = self.link(records);
        let total = linked.node_count();
        let graph = linked.prune();
        tracing::info!(
            "Generated {} nodes and {} edges ({} unconnected files pruned)",
            graph.node_count(),
            graph.edge_count(),
            total - graph.node_count()
        );
        graph
    }

    /// One node per record (id = record index) and one edge per resolved
    /// import occurrence, before pruning
    pub fn link(&self, records: &[FileRecord]) -> DependencyGraph {
        let nodes = records
            .iter()
            .enumerate()
            .map(|(index, record)| Node::new(NodeId(index), record.label(), record.path.clone()))
            .collect();

        let mut edges = Vec::new();
        for (source, record) in records.iter().enumerate() {
            for (ordinal, specifier) in record.imports.iter().enumerate() {
                match self.resolver.resolve(specifier, source, records) {
                    Some(target) => {
                        edges.push(Edge::new(NodeId(source), NodeId(target), ordinal));
                    }
                    None => {
                        tracing::trace!("{}: '{}' matched no file", record.path, specifier);
                    }
                }
            }
        }

        DependencyGraph { nodes, edges }
    }
}
