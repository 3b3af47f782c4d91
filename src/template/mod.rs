//! Template engines behind one interface.
//!
//! The engine is picked once from [`EngineKind`] when a preview session
//! starts. Every engine compiles template text into a [`CompiledTemplate`]
//! that renders against the JSON form of the payload.

mod filters;
mod liquid_engine;
mod preprocess;
mod tera_engine;

use std::collections::BTreeMap;
use std::error::Error as StdError;

use serde_json::Value;

use crate::config::{Config, EngineKind};
use crate::utils::error::Result;

pub use liquid_engine::LiquidEngine;
pub use tera_engine::TeraEngine;

/// Compiles template text
pub trait TemplateEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Replace every registered partial. Called once per generation, before
    /// anything is compiled.
    fn set_partials(&mut self, partials: &BTreeMap<String, String>) -> Result<()>;

    /// `name` identifies the template in error messages
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>>;
}

/// A parsed template ready to render
pub trait CompiledTemplate {
    fn render(&self, context: &Value) -> Result<String>;
}

/// Engine for the configured kind
pub fn create_engine(kind: EngineKind, config: &Config) -> Result<Box<dyn TemplateEngine>> {
    match kind {
        EngineKind::Liquid => Ok(Box::new(LiquidEngine::new(config)?)),
        EngineKind::Tera => Ok(Box::new(TeraEngine::new())),
    }
}

/// An error message followed by every underlying cause
pub(crate) fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
