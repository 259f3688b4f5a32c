// Directory scanner
//
// Discovery walks the tree with walkdir (iterative, sorted by file name) and
// prunes ignored directories before descending. Contents are then read one
// file at a time through tokio so a long scan keeps yielding to the runtime.

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file found by the scanner, with its raw contents
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the scanned root, `/`-separated
    pub path: String,
    pub contents: Vec<u8>,
}

/// A file or directory the scan could not read
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Output of one scan, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Walks a directory tree collecting source files
#[derive(Debug, Clone)]
pub struct Scanner {
    ignore_dirs: HashSet<String>,
    extensions: HashSet<String>,
    exclude: Vec<Pattern>,
    progress: bool,
}

impl Scanner {
    /// Build a scanner from scan settings
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let exclude = config
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            ignore_dirs: config.ignore_dirs.iter().cloned().collect(),
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            exclude,
            progress: false,
        })
    }

    /// Show a progress bar while reading files
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Scan `root`, reading every candidate file.
    ///
    /// Unreadable files and directories are recorded in `skipped`; only a
    /// missing or non-directory root is an error.
    pub async fn scan(&self, root: &Path) -> Result<ScanResult> {
        check_root(root)?;

        let discovery = {
            let scanner = self.clone();
            let root = root.to_path_buf();
            tokio::task::spawn_blocking(move || scanner.discover(&root))
                .await
                .map_err(|e| Error::analysis(format!("directory walk failed: {}", e)))?
        };
        let (candidates, mut skipped) = discovery;

        let (files, unreadable) = self.read_files(candidates).await;
        skipped.extend(unreadable);

        tracing::info!(
            "Scanned {}: {} files read, {} skipped",
            root.display(),
            files.len(),
            skipped.len()
        );

        Ok(ScanResult { files, skipped })
    }

    /// Read discovered candidates in order.
    ///
    /// Duplicate relative paths are read once. A file that cannot be read
    /// (permissions, removed since discovery) lands in the second list.
    pub async fn read_files(
        &self,
        candidates: Vec<(PathBuf, String)>,
    ) -> (Vec<SourceFile>, Vec<SkippedFile>) {
        let progress = self.progress_bar(candidates.len());
        let mut files = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for (path, relative) in candidates {
            if let Some(ref pb) = progress {
                pb.set_message(relative.clone());
                pb.inc(1);
            }

            if !seen.insert(relative.clone()) {
                continue;
            }

            match tokio::fs::read(&path).await {
                Ok(contents) => files.push(SourceFile {
                    path: relative,
                    contents,
                }),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
            tokio::task::yield_now().await;
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Scan complete");
        }

        (files, skipped)
    }

    /// List candidate files as (absolute path, normalized relative path)
    pub fn discover(&self, root: &Path) -> (Vec<(PathBuf, String)>, Vec<SkippedFile>) {
        let mut candidates = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_ignored_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_allowed_extension(entry.path()) {
                continue;
            }

            let relative = normalize(entry.path(), root);
            if self.is_excluded(&relative) {
                continue;
            }

            candidates.push((entry.into_path(), relative));
        }

        (candidates, skipped)
    }

    /// Never descend into an ignored directory; the root itself is exempt
    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.ignore_dirs.contains(name))
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }
}

/// Reject roots that do not exist or are not directories
pub fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Path relative to `root`, joined with `/` regardless of platform
fn normalize(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
