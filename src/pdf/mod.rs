pub mod document;
pub mod outline;
pub mod text;

pub use document::{LoadOptions, OutputDocument, SourceDocument};
pub use outline::OutlineEntry;
