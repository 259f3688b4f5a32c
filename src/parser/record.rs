// Per-file extraction records
//
// A record is produced once per scanned file and never modified afterwards.

use serde::{Deserialize, Serialize};

/// Imports and exports found in one source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the scanned root, `/`-separated
    pub path: String,
    /// Raw import specifiers in source order, duplicates kept
    pub imports: Vec<String>,
    /// Exported symbol names in source order
    pub exports: Vec<String>,
}

impl FileRecord {
    /// Create a record with no imports or exports
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Base name of the file, used as the display label
    pub fn label(&self) -> &str {
        file_name(&self.path)
    }

    /// Path with the final extension of the file name removed
    pub fn path_without_extension(&self) -> &str {
        strip_extension(&self.path)
    }
}

/// Last `/`-separated component of a normalized path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of a normalized path; `.` for files at the root
pub fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Drop the last `.ext` of the file name, leaving directories untouched
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_base_name() {
        let record = FileRecord::empty("src/components/Button.jsx");
        assert_eq!(record.label(), "Button.jsx");
        assert_eq!(FileRecord::empty("main.ts").label(), "main.ts");
    }

    #[test]
    fn test_path_without_extension() {
        let record = FileRecord::empty("src/utils/format.test.ts");
        assert_eq!(record.path_without_extension(), "src/utils/format.test");
    }

    #[test]
    fn test_strip_extension_ignores_dotted_directories() {
        assert_eq!(strip_extension("lib.v2/index"), "lib.v2/index");
        assert_eq!(strip_extension(".eslintrc"), ".eslintrc");
        assert_eq!(strip_extension("a.js"), "a");
    }

    #[test]
    fn test_directory_of() {
        assert_eq!(directory_of("src/a.js"), "src");
        assert_eq!(directory_of("src/ui/b.js"), "src/ui");
        assert_eq!(directory_of("a.js"), ".");
    }
}
