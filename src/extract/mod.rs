// * Structured Extraction
// * Classifies target URLs and pulls typed structure out of documentation
// * pages.

pub mod classify;
pub mod page;

// * Re-exports for convenient access
pub use classify::is_documentation_url;
pub use page::{parse_page_structure, ExtractError, Heading, PageExtractor, PageStructure};
