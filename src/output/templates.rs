// Template engine for generating the HTML report

use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Template engine wrapping Tera with the embedded report template
pub struct TemplateEngine {
    tera: Tera,
}

/// One row of the node table
#[derive(Debug, Clone, Serialize)]
pub struct NodeRow {
    pub label: String,
    pub path: String,
    /// Effective depth, the default for nodes no root reaches
    pub depth: u32,
    /// No root reaches this node
    pub unreached: bool,
    pub hidden: bool,
    pub imports: usize,
    pub imported_by: usize,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("report.html", include_str!("../../templates/report.html.tera"))?;

        tera.register_filter("pluralize", pluralize);
        tera.register_filter("depth_label", depth_label);

        Ok(Self { tera })
    }

    /// Render a template by name
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

/// Show a depth, marking nodes no root reaches
fn depth_label(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let depth = value.as_u64().unwrap_or(0);
    let unreached = args
        .get("unreached")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if unreached {
        Ok(Value::String(format!("{} (unreached)", depth)))
    } else {
        Ok(Value::String(depth.to_string()))
    }
}
