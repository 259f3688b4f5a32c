// SVG export of the visible subgraph
//
// Coordinates are shifted so the padded bounding box of the visible nodes
// starts at the origin of the document.

use crate::analysis::{DependencyGraph, Rect};
use crate::config::OutputConfig;
use crate::error::{Error, Result};
use std::fmt::Write;

const NODE_FILL: &str = "#ffffff";
const NODE_STROKE: &str = "#dddddd";
const EDGE_STROKE: &str = "#b1b1b7";
const LABEL_COLOR: &str = "#222222";

/// Renders visible nodes and edges as a standalone SVG document
#[derive(Debug, Clone)]
pub struct SvgExporter {
    padding: f64,
    corner_radius: f64,
}

impl SvgExporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            padding: config.padding,
            corner_radius: config.corner_radius,
        }
    }

    /// Render the visible part of `graph`.
    ///
    /// Fails when nothing is visible or a visible node has no position.
    pub fn render(&self, graph: &DependencyGraph) -> Result<String> {
        let mut placed = Vec::new();
        for node in graph.visible_nodes() {
            let rect = node
                .position
                .ok_or_else(|| Error::LayoutMissing(node.label.clone()))?;
            placed.push((node, rect));
        }
        if placed.is_empty() {
            return Err(Error::NoVisibleNodes);
        }

        let min_x = placed.iter().map(|(_, r)| r.x).fold(f64::INFINITY, f64::min);
        let min_y = placed.iter().map(|(_, r)| r.y).fold(f64::INFINITY, f64::min);
        let max_x = placed.iter().map(|(_, r)| r.right()).fold(f64::NEG_INFINITY, f64::max);
        let max_y = placed.iter().map(|(_, r)| r.bottom()).fold(f64::NEG_INFINITY, f64::max);

        let width = max_x - min_x + 2.0 * self.padding;
        let height = max_y - min_y + 2.0 * self.padding;
        let shift = |rect: Rect| {
            Rect::new(
                rect.x - min_x + self.padding,
                rect.y - min_y + self.padding,
                rect.width,
                rect.height,
            )
        };

        let mut svg = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(width),
            h = fmt_num(height)
        );

        for edge in graph.visible_edges() {
            let (Some(source), Some(target)) = (
                graph.node(edge.source).and_then(|n| n.position),
                graph.node(edge.target).and_then(|n| n.position),
            ) else {
                continue;
            };
            let (sx, sy) = shift(source).bottom_center();
            let (tx, ty) = shift(target).top_center();
            let mid_y = (sy + ty) / 2.0;
            let _ = writeln!(
                svg,
                r#"  <path id="{id}" d="M {sx} {sy} C {sx} {my}, {tx} {my}, {tx} {ty}" fill="none" stroke="{stroke}" stroke-width="1"/>"#,
                id = edge.id(),
                sx = fmt_num(sx),
                sy = fmt_num(sy),
                tx = fmt_num(tx),
                ty = fmt_num(ty),
                my = fmt_num(mid_y),
                stroke = EDGE_STROKE
            );
        }

        for (node, rect) in placed {
            let rect = shift(rect);
            let (cx, cy) = rect.center();
            let _ = writeln!(svg, r#"  <g id="node-{}">"#, node.id.0);
            let _ = writeln!(
                svg,
                r#"    <rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}" stroke="{}"/>"#,
                fmt_num(rect.x),
                fmt_num(rect.y),
                fmt_num(rect.width),
                fmt_num(rect.height),
                NODE_FILL,
                NODE_STROKE,
                r = fmt_num(self.corner_radius)
            );
            let _ = writeln!(
                svg,
                r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="12" fill="{}">{}</text>"#,
                fmt_num(cx),
                fmt_num(cy),
                LABEL_COLOR,
                escape_xml(&node.label)
            );
            svg.push_str("  </g>\n");
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

/// Format a coordinate without a trailing `.0` and with at most two decimals
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Escape text for use in XML content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
