// Parser module for extracting import/export records from source files

mod extractor;
pub mod record;

pub use extractor::Extractor;
pub use record::FileRecord;
