// Output generation module

pub mod diagrams;
pub mod html;
pub mod svg;
pub mod templates;

pub use diagrams::*;
pub use html::*;
pub use svg::*;
pub use templates::*;
