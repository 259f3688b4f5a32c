//! Flowmap - turn a source folder into a layered import graph
//!
//! Scans a directory for source files, extracts ES-style import and export
//! statements, links files through their import specifiers, assigns each
//! file a depth below the entry points and renders the visible part of the
//! graph as SVG, Mermaid, JSON or an HTML report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod session;

// Re-export main types
pub use analysis::{
    AnalysisResult, Analyzer, DependencyGraph, Edge, GraphBuilder, HeuristicResolver,
    LayeredLayout, Layout, Node, NodeId, Rect, Scanner, SpecifierResolver,
};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{DiagramGenerator, HtmlGenerator, SvgExporter};
pub use parser::{Extractor, FileRecord};
pub use session::{ScanTicket, Session};
