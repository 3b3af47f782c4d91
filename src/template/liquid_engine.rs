use std::collections::BTreeMap;

use liquid::partials::{EagerCompiler, InMemorySource};
use liquid::{Parser, ParserBuilder};
use log::debug;
use serde_json::Value;

use super::filters::register_filters;
use super::preprocess::{preprocess_liquid, preprocess_partial};
use super::{describe, CompiledTemplate, TemplateEngine};
use crate::builder::yaml::json_to_liquid;
use crate::config::Config;
use crate::utils::error::{PreviewError, Result};

/// Liquid with the standard library, Jekyll style includes and the Jekyll
/// URL and date filters
pub struct LiquidEngine {
    config: Config,
    parser: Parser,
}

impl LiquidEngine {
    pub fn new(config: &Config) -> Result<Self> {
        let parser = build_parser(config, &BTreeMap::new())?;
        Ok(LiquidEngine {
            config: config.clone(),
            parser,
        })
    }
}

/// Partials are compiled eagerly with the parser, so a partial with a syntax
/// error fails here rather than at the first include.
fn build_parser(config: &Config, partials: &BTreeMap<String, String>) -> Result<Parser> {
    let mut source = InMemorySource::new();
    for (name, text) in partials {
        source.add(name.as_str(), preprocess_partial(text));
    }

    register_filters(ParserBuilder::with_stdlib(), config)
        .partials(EagerCompiler::new(source))
        .build()
        .map_err(|e| PreviewError::TemplateCompile {
            name: "partials".to_string(),
            reason: describe(&e),
        })
}

impl TemplateEngine for LiquidEngine {
    fn name(&self) -> &'static str {
        "liquid"
    }

    fn set_partials(&mut self, partials: &BTreeMap<String, String>) -> Result<()> {
        self.parser = build_parser(&self.config, partials)?;
        debug!("Registered {} liquid partial(s)", partials.len());
        Ok(())
    }

    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>> {
        let template = self
            .parser
            .parse(&preprocess_liquid(source))
            .map_err(|e| PreviewError::TemplateCompile {
                name: name.to_string(),
                reason: describe(&e),
            })?;

        Ok(Box::new(LiquidTemplate {
            name: name.to_string(),
            template,
        }))
    }
}

struct LiquidTemplate {
    name: String,
    template: liquid::Template,
}

impl CompiledTemplate for LiquidTemplate {
    fn render(&self, context: &Value) -> Result<String> {
        let globals = match json_to_liquid(context.clone()) {
            liquid::model::Value::Object(object) => object,
            _ => liquid::Object::new(),
        };

        self.template
            .render(&globals)
            .map_err(|e| PreviewError::TemplateRender {
                name: self.name.clone(),
                reason: describe(&e),
            })
    }
}
