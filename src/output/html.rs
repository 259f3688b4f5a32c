// HTML report
//
// A single self-contained page: the SVG of the visible subgraph followed by
// a table of every node, import cycles and skipped files.

use crate::analysis::AnalysisResult;
use crate::error::{Error, Result};
use crate::output::svg::SvgExporter;
use crate::output::templates::{NodeRow, TemplateEngine};
use tera::Context;

/// HTML report generator
pub struct HtmlGenerator {
    project_name: String,
    exporter: SvgExporter,
    template_engine: TemplateEngine,
}

impl HtmlGenerator {
    /// Create a new HTML generator
    pub fn new(project_name: impl Into<String>, exporter: SvgExporter) -> Result<Self> {
        Ok(Self {
            project_name: project_name.into(),
            exporter,
            template_engine: TemplateEngine::new()?,
        })
    }

    /// Render the report for `analysis` at the given threshold.
    ///
    /// A graph with nothing visible still produces a page, without a drawing.
    pub fn generate(&self, analysis: &AnalysisResult, threshold: u32) -> Result<String> {
        let graph = &analysis.graph;

        let svg = match self.exporter.render(graph) {
            Ok(svg) => Some(svg),
            Err(Error::NoVisibleNodes) => None,
            Err(e) => return Err(e),
        };

        let nodes: Vec<NodeRow> = graph
            .nodes
            .iter()
            .map(|node| NodeRow {
                label: node.label.clone(),
                path: node.path.clone(),
                depth: node.effective_depth(),
                unreached: node.depth.is_none(),
                hidden: node.hidden,
                imports: graph.imports_of(node.id).len(),
                imported_by: graph.imported_by(node.id).len(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("project_name", &self.project_name);
        context.insert("stats", &graph.stats());
        context.insert("threshold", &threshold);
        context.insert("max_depth", &analysis.max_depth);
        context.insert("svg", &svg);
        context.insert("nodes", &nodes);
        context.insert("cycles", &analysis.cycle_paths());
        context.insert("skipped", &analysis.skipped);

        self.template_engine.render("report.html", &context)
    }
}
