/// Builds resources from classified report lines.
pub mod builder;
/// Works out what each line of the report describes.
pub mod classifier;

pub use builder::{parse, TreeBuilder};
