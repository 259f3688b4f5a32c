//! CLI module for flowmap

mod args;

pub use args::{Args, Command};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::config::{Config, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{DiagramGenerator, HtmlGenerator, SvgExporter};
use crate::session::Session;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    let verbose = matches!(args.command, Command::Analyze { verbose: true, .. });
    init_logging(verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(args)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("flowmap={}", level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn execute(args: Args) -> Result<()> {
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
            // Load config file if it exists
            let mut cfg = match &config {
                Some(config_path) => Config::load(config_path)?,
                None => Config::load_or_default(Path::new("flowmap.toml")),
            };

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(output, ignore, exclude, format, depth);
            cfg.validate()?;

            if verbose {
                println!("Analyzing: {}", path.display());
                println!("Format: {:?}", cfg.output.format);
                println!("Ignore: {:?}", cfg.scan.ignore_dirs);
                println!("Exclude: {:?}", cfg.scan.exclude);
                if let Some(d) = cfg.output.depth {
                    println!("Depth: {}", d);
                }
            }

            let analyzer = Analyzer::new(&cfg)?.with_verbose(verbose);
            let mut session = Session::new(cfg.clone());

            let ticket = session.request_scan(&path)?;
            println!("Folder found: {}", path.display());
            println!("Parsing files...");
            let result = ticket.run(&analyzer).await;
            session.complete(&ticket, result)?;
            println!("{}", session.status());

            if let Some(d) = cfg.output.depth {
                let applied = session.set_threshold(d);
                println!("Showing depth {} of {}", applied, max_depth(&session));
            }

            let snapshot = session.snapshot().ok_or(Error::NoSnapshot)?;
            report_diagnostics(snapshot);

            let project_name = project_name(&cfg, &path);
            let rendered = match cfg.output.format {
                OutputFormat::Svg => session.export_svg()?,
                OutputFormat::Json => serde_json::to_string_pretty(&snapshot.graph)?,
                OutputFormat::Mermaid => DiagramGenerator::new().generate(&snapshot.graph),
                OutputFormat::Html => {
                    let generator =
                        HtmlGenerator::new(project_name.clone(), SvgExporter::new(&cfg.output))?;
                    generator.generate(snapshot, session.threshold())?
                }
            };

            let output_path = cfg.output.file.clone().unwrap_or_else(|| {
                PathBuf::from(format!("{}.{}", project_name, cfg.output.format.extension()))
            });
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, rendered)?;
            println!("Written to: {}", output_path.display());

            Ok(())
        }

        Command::Version => {
            println!("flowmap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn max_depth(session: &Session) -> u32 {
    session.snapshot().map_or(0, |s| s.max_depth)
}

/// Print skipped files and import cycles
fn report_diagnostics(analysis: &AnalysisResult) {
    if !analysis.skipped.is_empty() {
        println!("\nSkipped ({}):", analysis.skipped.len());
        for item in analysis.skipped.iter().take(5) {
            println!("  {}: {}", item.path.display(), item.reason);
        }
        if analysis.skipped.len() > 5 {
            println!("  ... and {} more", analysis.skipped.len() - 5);
        }
    }

    let cycles = analysis.cycle_paths();
    if !cycles.is_empty() {
        println!("\nImport cycles ({}):", cycles.len());
        for cycle in &cycles {
            println!("  {}", cycle.join(" -> "));
        }
    }
}

/// Project name from config, falling back to the folder name
fn project_name(cfg: &Config, path: &Path) -> String {
    if cfg.project.name == "Untitled Project" || cfg.project.name.is_empty() {
        path.canonicalize()
            .ok()
            .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .unwrap_or_else(|| "flowmap".to_string())
    } else {
        cfg.project.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_name_from_folder() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("storefront");
        std::fs::create_dir(&project).unwrap();
        assert_eq!(project_name(&Config::default(), &project), "storefront");
    }

    #[test]
    fn test_project_name_from_config() {
        let mut cfg = Config::default();
        cfg.project.name = "Checkout".to_string();
        assert_eq!(project_name(&cfg, Path::new(".")), "Checkout");
    }
}
