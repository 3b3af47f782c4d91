pub mod parser;
pub mod types;

// Re-export the most common items for convenience
pub use parser::{parse, parse_data, split, FrontMatterError};
pub use types::FrontMatter;
