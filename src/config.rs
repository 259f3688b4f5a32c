use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub scan: ScanConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

/// Directory scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names never descended into, at any depth
    pub ignore_dirs: Vec<String>,
    /// File extensions kept, without the leading dot
    pub extensions: Vec<String>,
    /// Glob patterns matched against the path relative to the root
    pub exclude: Vec<String>,
}

/// Settings for the built-in layered layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Horizontal gap between nodes of the same rank
    pub node_sep: f64,
    /// Vertical gap between ranks
    pub rank_sep: f64,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
    pub padding: f64,
    pub corner_radius: f64,
    /// Depth threshold; `None` shows every level
    pub depth: Option<u32>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
    Mermaid,
    Html,
}

impl OutputFormat {
    /// File extension used when no output file is given
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
            OutputFormat::Mermaid => "mmd",
            OutputFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "html" => Ok(OutputFormat::Html),
            _ => Err(Error::other(format!(
                "Unknown format: '{}'. Valid formats: svg, json, mermaid, html",
                s
            ))),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: ["node_modules", ".git", "build", "dist", "public"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extensions: ["js", "jsx", "ts", "tsx", "vue", "php", "rb", "py"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: vec![],
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 172.0,
            node_height: 36.0,
            node_sep: 50.0,
            rank_sep: 50.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            file: None,
            padding: 20.0,
            corner_radius: 5.0,
            depth: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::Io(_)) => Config::default(),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        ignore: Vec<String>,
        exclude: Vec<String>,
        format: Option<OutputFormat>,
        depth: Option<u32>,
    ) {
        if let Some(out) = output {
            self.output.file = Some(out);
        }

        if !ignore.is_empty() {
            self.scan.ignore_dirs.extend(ignore);
        }

        if !exclude.is_empty() {
            self.scan.exclude.extend(exclude);
        }

        if let Some(fmt) = format {
            self.output.format = fmt;
        }

        if let Some(d) = depth {
            self.output.depth = Some(d);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(Error::config_validation("at least one extension required"));
        }

        if self.layout.node_width <= 0.0 || self.layout.node_height <= 0.0 {
            return Err(Error::config_validation("node size must be positive"));
        }

        if self.layout.node_sep < 0.0 || self.layout.rank_sep < 0.0 {
            return Err(Error::config_validation("separation must not be negative"));
        }

        if self.output.padding < 0.0 || self.output.corner_radius < 0.0 {
            return Err(Error::config_validation(
                "padding and corner_radius must not be negative",
            ));
        }

        if self.output.depth == Some(0) {
            return Err(Error::config_validation("depth must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.name, "Untitled Project");
        assert_eq!(config.output.format, OutputFormat::Svg);
        assert_eq!(config.output.padding, 20.0);
        assert!(config.output.depth.is_none());
        assert!(config.scan.ignore_dirs.contains(&"node_modules".to_string()));
        assert_eq!(config.scan.extensions.len(), 8);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "Storefront"

[scan]
ignore_dirs = ["vendor"]
exclude = ["**/*.test.js"]

[layout]
rank_sep = 80.0

[output]
format = "mermaid"
depth = 3
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project.name, "Storefront");
        assert_eq!(config.scan.ignore_dirs, vec!["vendor".to_string()]);
        assert_eq!(config.scan.exclude, vec!["**/*.test.js".to_string()]);
        assert_eq!(config.layout.rank_sep, 80.0);
        assert_eq!(config.layout.node_width, 172.0);
        assert_eq!(config.output.format, OutputFormat::Mermaid);
        assert_eq!(config.output.depth, Some(3));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/flowmap.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/flowmap.toml"));
        assert_eq!(config.project.name, "Untitled Project");
    }

    #[test]
    fn test_validation_empty_extensions() {
        let mut config = Config::default();
        config.scan.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_node_size() {
        let mut config = Config::default();
        config.layout.node_height = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_negative_padding() {
        let mut config = Config::default();
        config.output.padding = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_depth() {
        let mut config = Config::default();
        config.output.depth = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config.merge_cli(Some(PathBuf::from("/tmp/graph.svg")), vec![], vec![], None, None);
        assert_eq!(config.output.file, Some(PathBuf::from("/tmp/graph.svg")));
    }

    #[test]
    fn test_merge_cli_ignore_and_exclude() {
        let mut config = Config::default();
        let initial_ignores = config.scan.ignore_dirs.len();
        config.merge_cli(
            None,
            vec!["vendor".to_string()],
            vec!["**/*.spec.ts".to_string()],
            None,
            None,
        );
        assert_eq!(config.scan.ignore_dirs.len(), initial_ignores + 1);
        assert_eq!(config.scan.exclude.len(), 1);
    }

    #[test]
    fn test_merge_cli_format_and_depth() {
        let mut config = Config::default();
        config.merge_cli(None, vec![], vec![], Some(OutputFormat::Json), Some(2));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.depth, Some(2));
    }

    #[test]
    fn test_output_format_parsing() {
        let toml_str = r#"format = "html""#;
        let output: OutputConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(output.format, OutputFormat::Html);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("SVG".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("mmd".parse::<OutputFormat>().unwrap(), OutputFormat::Mermaid);
        assert!("png".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Mermaid.extension(), "mmd");
    }
}
