// Analysis module: scan, extract, build, depth

pub mod builder;
pub mod depth;
pub mod graph;
pub mod layout;
pub mod resolver;
pub mod scanner;
mod visibility;

pub use builder::*;
pub use depth::*;
pub use graph::*;
pub use layout::*;
pub use resolver::*;
pub use scanner::*;

use crate::config::Config;
use crate::error::Result;
use crate::parser::{Extractor, FileRecord};
use std::path::{Path, PathBuf};

/// Result of analyzing a directory
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// The directory that was scanned
    pub root: PathBuf,
    /// One record per scanned file, in scan order
    pub records: Vec<FileRecord>,
    /// Pruned graph with depths assigned and every node visible
    pub graph: DependencyGraph,
    pub max_depth: u32,
    /// Files or directories that could not be read
    pub skipped: Vec<SkippedFile>,
}

impl AnalysisResult {
    /// Names of files in import cycles, one list per cycle
    pub fn cycle_paths(&self) -> Vec<Vec<String>> {
        self.graph
            .cycles()
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .filter_map(|id| self.graph.node(id).map(|n| n.path.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Main analyzer that orchestrates the analysis pipeline
pub struct Analyzer {
    scanner: Scanner,
    extractor: Extractor,
    resolver: Box<dyn SpecifierResolver>,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(&config.scan)?,
            extractor: Extractor::new()?,
            resolver: Box::new(HeuristicResolver::new()),
        })
    }

    /// Show a progress bar while scanning
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.scanner = self.scanner.with_progress(verbose);
        self
    }

    /// Swap the specifier resolver
    pub fn with_resolver(mut self, resolver: Box<dyn SpecifierResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Analyze the directory at `root`.
    ///
    /// Only a missing or non-directory root fails; an empty tree or a tree
    /// without resolvable imports produces an empty graph.
    pub async fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        // Step 1: Scan files
        let scan = self.scanner.scan(root).await?;

        // Step 2: Extract imports and exports
        let records: Vec<FileRecord> = scan
            .files
            .iter()
            .map(|file| self.extractor.extract(file))
            .collect();
        tracing::info!("Parsed {} components", records.len());

        // Step 3: Build and prune the graph
        let mut graph = GraphBuilder::new(self.resolver.as_ref()).build(&records);

        // Step 4: Depths
        let max_depth = graph.assign_depths();

        Ok(AnalysisResult {
            root: root.to_path_buf(),
            records,
            graph,
            max_depth,
            skipped: scan.skipped,
        })
    }

    /// Number of files a scan of `root` would read
    pub fn file_count(&self, root: &Path) -> Result<usize> {
        check_root(root)?;
        Ok(self.scanner.discover(root).0.len())
    }
}
