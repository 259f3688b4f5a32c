// Lexical import/export extraction
//
// This is a best-effort pattern scan over the file text, not a parser.
// Shapes the patterns do not cover (re-exports, `export { a, b }`,
// namespace imports, dynamic `import()`) are silently missed.

use crate::analysis::SourceFile;
use crate::error::Result;
use crate::parser::record::FileRecord;
use regex::Regex;

const IMPORT_PATTERN: &str = r#"import\s+(?:(?:\{[^}]+\}|\S+)\s+from\s+)?['"]([^'"]+)['"]"#;
// Names are ASCII word characters only; `café` is captured as `caf`.
const EXPORT_PATTERN: &str =
    r"export\s+(default\s+)?(?:function|class|const)\s+([A-Za-z0-9_]+)";

/// Extracts import specifiers and exported names from source text
#[derive(Debug, Clone)]
pub struct Extractor {
    import_re: Regex,
    export_re: Regex,
}

impl Extractor {
    /// Compile the extraction patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_re: Regex::new(IMPORT_PATTERN)?,
            export_re: Regex::new(EXPORT_PATTERN)?,
        })
    }

    /// Extract a record from a scanned file.
    ///
    /// Contents that are not valid UTF-8 yield an empty record.
    pub fn extract(&self, file: &SourceFile) -> FileRecord {
        match std::str::from_utf8(&file.contents) {
            Ok(text) => self.extract_text(&file.path, text),
            Err(e) => {
                tracing::debug!("{} is not text ({}), recording no imports", file.path, e);
                FileRecord::empty(file.path.clone())
            }
        }
    }

    /// Extract a record from already-decoded text
    pub fn extract_text(&self, path: &str, text: &str) -> FileRecord {
        let imports: Vec<String> = self
            .import_re
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        let exports: Vec<String> = self
            .export_re
            .captures_iter(text)
            .filter_map(|cap| cap.get(2))
            .map(|m| m.as_str().to_string())
            .collect();

        tracing::debug!(
            "Parsed {}: {} imports, {} exports",
            path,
            imports.len(),
            exports.len()
        );

        FileRecord {
            path: path.to_string(),
            imports,
            exports,
        }
    }
}
