//! CLI argument parsing

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn a source folder into a layered import graph
#[derive(Parser, Debug)]
#[command(name = "flowmap")]
#[command(about = "Turn a source folder into a layered import graph")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a folder and export its import graph
    Analyze {
        /// Folder to analyze
        path: PathBuf,

        /// Output file (defaults to <folder name>.<format extension>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (svg, json, mermaid, html)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Hide files deeper than this many levels
        #[arg(long)]
        depth: Option<u32>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Extra directory names to skip (can be repeated)
        #[arg(long)]
        ignore: Vec<String>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let args = Args::try_parse_from(["flowmap", "analyze", "./web"]).unwrap();
        match args.command {
            Command::Analyze {
                path,
                output,
                format,
                depth,
                config,
                ignore,
                exclude,
                verbose,
            } => {
                assert_eq!(path, PathBuf::from("./web"));
                assert!(output.is_none());
                assert!(format.is_none());
                assert!(depth.is_none());
                assert!(config.is_none());
                assert!(ignore.is_empty());
                assert!(exclude.is_empty());
                assert!(!verbose);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_with_options() {
        let args = Args::try_parse_from([
            "flowmap", "analyze", "./project",
            "--output", "/tmp/graph.html",
            "--format", "html",
            "--depth", "2",
            "--config", "custom.toml",
            "--ignore", "vendor",
            "--ignore", "coverage",
            "--exclude", "**/*.test.js",
            "--verbose",
        ])
        .unwrap();

        match args.command {
            Command::Analyze {
                path,
                output,
                format,
                depth,
                config,
                ignore,
                exclude,
                verbose,
            } => {
                assert_eq!(path, PathBuf::from("./project"));
                assert_eq!(output, Some(PathBuf::from("/tmp/graph.html")));
                assert_eq!(format, Some(OutputFormat::Html));
                assert_eq!(depth, Some(2));
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
                assert_eq!(ignore, vec!["vendor".to_string(), "coverage".to_string()]);
                assert_eq!(exclude, vec!["**/*.test.js".to_string()]);
                assert!(verbose);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Args::try_parse_from(["flowmap", "analyze", ".", "--format", "png"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_command() {
        let args = Args::try_parse_from(["flowmap", "version"]).unwrap();
        assert!(matches!(args.command, Command::Version));
    }
}
