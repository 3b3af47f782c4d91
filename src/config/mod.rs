mod defaults;
mod loader;
mod types;
pub mod validation;

pub use loader::load_config;
pub use types::*;
