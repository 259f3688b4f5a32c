// Import specifier resolution
//
// Decides which scanned file, if any, an import specifier refers to. The
// graph builder only talks to the `SpecifierResolver` trait, so a real module
// resolver can replace the heuristic without touching the rest of the
// pipeline.

use crate::parser::FileRecord;

/// Maps an import specifier to one of the scanned files
pub trait SpecifierResolver: Send + Sync {
    /// Index into `files` of the file `specifier` refers to, if any.
    ///
    /// `source` is the index of the importing file.
    fn resolve(&self, specifier: &str, source: usize, files: &[FileRecord]) -> Option<usize>;
}

/// Loose substring matching on paths.
///
/// After removing one leading `./` or `../` from the specifier, the first
/// other file (in scan order) matches when its path contains the specifier,
/// or when the specifier contains its path minus the extension. Short or
/// ambiguous names produce false positives; that is accepted behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicResolver;

impl HeuristicResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Remove a single leading `./` or `../`
pub fn strip_relative_marker(specifier: &str) -> &str {
    specifier
        .strip_prefix("./")
        .or_else(|| specifier.strip_prefix("../"))
        .unwrap_or(specifier)
}

impl SpecifierResolver for HeuristicResolver {
    fn resolve(&self, specifier: &str, source: usize, files: &[FileRecord]) -> Option<usize> {
        let name = strip_relative_marker(specifier);
        files
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != source)
            .find(|(_, file)| {
                file.path.contains(name) || name.contains(file.path_without_extension())
            })
            .map(|(index, _)| index)
    }
}
