//! Current-snapshot state for one interactive session.
//!
//! A scan is requested with [`Session::request_scan`], runs without holding
//! the session, and is handed back through [`Session::complete`]. Each request
//! bumps a generation counter; a result from an older generation, or for a
//! root other than the latest requested one, is discarded. An accepted result
//! replaces the previous snapshot wholesale.

use crate::analysis::{check_root, AnalysisResult, Analyzer, Layout, LayeredLayout};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::SvgExporter;
use std::path::{Path, PathBuf};

/// Handle for one requested scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTicket {
    generation: u64,
    root: PathBuf,
}

impl ScanTicket {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the analysis this ticket stands for
    pub async fn run(&self, analyzer: &Analyzer) -> Result<AnalysisResult> {
        analyzer.analyze(&self.root).await
    }
}

/// Holds the latest accepted analysis and the view state derived from it
pub struct Session {
    config: Config,
    layout: Box<dyn Layout>,
    generation: u64,
    requested_root: Option<PathBuf>,
    snapshot: Option<AnalysisResult>,
    threshold: u32,
    status: String,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let layout = Box::new(LayeredLayout::new(&config.layout));
        Self {
            config,
            layout,
            generation: 0,
            requested_root: None,
            snapshot: None,
            threshold: 0,
            status: "Select a project folder".to_string(),
        }
    }

    /// Use a different layout collaborator
    pub fn with_layout(mut self, layout: Box<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// User-visible status line
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn snapshot(&self) -> Option<&AnalysisResult> {
        self.snapshot.as_ref()
    }

    /// Current depth threshold; 0 before any analysis
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Start a scan of `root`, superseding any outstanding one.
    ///
    /// A missing or non-directory root leaves the session as it was, apart
    /// from the status line.
    pub fn request_scan(&mut self, root: impl Into<PathBuf>) -> Result<ScanTicket> {
        let root = root.into();
        if let Err(e) = check_root(&root) {
            self.status = e.to_string();
            return Err(e);
        }

        self.generation += 1;
        self.requested_root = Some(root.clone());
        self.status = format!("Folder found: {}", root.display());
        tracing::debug!("Scan #{} requested for {}", self.generation, root.display());

        Ok(ScanTicket {
            generation: self.generation,
            root,
        })
    }

    /// Whether `ticket` still names the latest request
    pub fn is_current(&self, ticket: &ScanTicket) -> bool {
        ticket.generation == self.generation
            && self.requested_root.as_deref() == Some(ticket.root.as_path())
    }

    /// Install the result of a scan; returns false if it was stale.
    ///
    /// An accepted result is laid out and shown at full depth.
    pub fn complete(&mut self, ticket: &ScanTicket, result: Result<AnalysisResult>) -> Result<bool> {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding scan #{} of {} (latest is #{})",
                ticket.generation,
                ticket.root.display(),
                self.generation
            );
            return Ok(false);
        }

        let mut result = match result {
            Ok(result) => result,
            Err(e) => {
                self.status = e.to_string();
                return Err(e);
            }
        };

        let positions = self
            .layout
            .layout(&result.graph, &result.graph.directory_groups())?;
        result.graph.apply_positions(&positions);

        self.threshold = result.max_depth;
        result.graph.show_all();
        self.status = format!(
            "Generated {} nodes and {} edges",
            result.graph.node_count(),
            result.graph.edge_count()
        );
        self.snapshot = Some(result);
        Ok(true)
    }

    /// Change the depth threshold, clamped to `1..=max_depth`; returns the
    /// threshold actually applied
    pub fn set_threshold(&mut self, threshold: u32) -> u32 {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return self.threshold;
        };
        let applied = threshold.clamp(1, snapshot.max_depth.max(1));
        snapshot.graph.apply_threshold(applied);
        self.threshold = applied;
        applied
    }

    /// Render the visible subgraph as SVG
    pub fn export_svg(&mut self) -> Result<String> {
        let exporter = SvgExporter::new(&self.config.output);
        let rendered = match self.snapshot.as_ref() {
            Some(snapshot) => exporter.render(&snapshot.graph),
            None => Err(Error::NoSnapshot),
        };
        match rendered {
            Ok(svg) => {
                self.status = "Exported SVG".to_string();
                Ok(svg)
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DependencyGraph, DirectoryGroup, Positions};
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    fn chain_project() -> TempDir {
        project(&[
            ("a.js", "import b from './b'"),
            ("b.js", "import c from './c'"),
            ("c.js", ""),
        ])
    }

    async fn scan(session: &mut Session, root: &Path) -> bool {
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let ticket = session.request_scan(root).unwrap();
        let result = ticket.run(&analyzer).await;
        session.complete(&ticket, result).unwrap()
    }

    #[tokio::test]
    async fn test_complete_installs_snapshot() {
        let dir = chain_project();
        let mut session = Session::new(Config::default());
        assert!(scan(&mut session, dir.path()).await);

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.graph.node_count(), 3);
        assert_eq!(session.threshold(), 3);
        assert!(snapshot.graph.nodes.iter().all(|n| n.position.is_some()));
        assert_eq!(session.status(), "Generated 3 nodes and 2 edges");
    }

    #[tokio::test]
    async fn test_stale_result_discarded() {
        let first = chain_project();
        let second = project(&[("x.js", "import y from './y'"), ("y.js", "")]);
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let mut session = Session::new(Config::default());

        let old = session.request_scan(first.path()).unwrap();
        let new = session.request_scan(second.path()).unwrap();

        let old_result = old.run(&analyzer).await;
        let new_result = new.run(&analyzer).await;

        // The newer scan lands first, then the stale one arrives
        assert!(session.complete(&new, new_result).unwrap());
        assert!(!session.complete(&old, old_result).unwrap());
        assert_eq!(session.snapshot().unwrap().root, second.path());
    }

    #[tokio::test]
    async fn test_same_root_rescan_supersedes() {
        let dir = chain_project();
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let mut session = Session::new(Config::default());

        let first = session.request_scan(dir.path()).unwrap();
        let second = session.request_scan(dir.path()).unwrap();
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert_eq!(second.root(), dir.path());
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));

        let result = first.run(&analyzer).await;
        assert!(!session.complete(&first, result).unwrap());
        assert!(session.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_new_scan_replaces_not_merges() {
        let first = chain_project();
        let second = project(&[("x.js", "import y from './y'"), ("y.js", "")]);
        let mut session = Session::new(Config::default());

        assert!(scan(&mut session, first.path()).await);
        assert!(scan(&mut session, second.path()).await);

        let graph = &session.snapshot().unwrap().graph;
        let paths: Vec<&str> = graph.nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["x.js", "y.js"]);
        assert_eq!(session.threshold(), 2);
    }

    #[test]
    fn test_request_scan_without_folder() {
        let dir = project(&[("a.js", "")]);
        let mut session = Session::new(Config::default());
        let result = session.request_scan(dir.path().join("a.js"));
        assert!(matches!(result, Err(Error::NotADirectory(_))));
        assert!(session.status().starts_with("No folder found"));
        assert!(session.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_failed_request_keeps_previous_snapshot() {
        let dir = chain_project();
        let mut session = Session::new(Config::default());
        assert!(scan(&mut session, dir.path()).await);

        assert!(session.request_scan("/nonexistent/project").is_err());
        assert_eq!(session.snapshot().unwrap().graph.node_count(), 3);
    }

    #[tokio::test]
    async fn test_set_threshold_clamps_and_filters() {
        let dir = chain_project();
        let mut session = Session::new(Config::default());
        scan(&mut session, dir.path()).await;

        assert_eq!(session.set_threshold(2), 2);
        let graph = &session.snapshot().unwrap().graph;
        assert_eq!(graph.visible_nodes().count(), 2);
        assert_eq!(graph.visible_edges().count(), 1);

        assert_eq!(session.set_threshold(0), 1);
        assert_eq!(session.set_threshold(99), 3);
        assert_eq!(session.snapshot().unwrap().graph.visible_nodes().count(), 3);
    }

    #[tokio::test]
    async fn test_export_svg() {
        let dir = chain_project();
        let mut session = Session::new(Config::default());
        scan(&mut session, dir.path()).await;

        let svg = session.export_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(session.status(), "Exported SVG");
    }

    #[tokio::test]
    async fn test_export_with_no_visible_nodes() {
        let dir = project(&[("a.js", "import m from './missing'"), ("b.js", "")]);
        let mut session = Session::new(Config::default());
        assert!(scan(&mut session, dir.path()).await);

        let result = session.export_svg();
        assert!(matches!(result, Err(Error::NoVisibleNodes)));
        assert!(session.status().contains("no visible nodes"));
        assert!(session.snapshot().unwrap().graph.is_empty());
    }

    #[test]
    fn test_export_before_any_scan() {
        let mut session = Session::new(Config::default());
        assert!(matches!(session.export_svg(), Err(Error::NoSnapshot)));
    }

    /// A layout engine that places nothing
    struct NoPlacement;

    impl Layout for NoPlacement {
        fn layout(&self, _graph: &DependencyGraph, _groups: &[DirectoryGroup]) -> Result<Positions> {
            Ok(Positions::new())
        }
    }

    #[tokio::test]
    async fn test_export_without_placement() {
        let dir = chain_project();
        let mut session = Session::new(Config::default()).with_layout(Box::new(NoPlacement));
        assert!(scan(&mut session, dir.path()).await);

        let result = session.export_svg();
        assert!(matches!(result, Err(Error::LayoutMissing(ref label)) if label == "a.js"));
        assert_eq!(session.status(), "Nothing to export: layout has not placed a.js");
        assert!(session.snapshot().unwrap().graph.nodes.iter().all(|n| n.position.is_none()));
    }
}
