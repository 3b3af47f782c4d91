use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde_json::Value;
use tera::{Context, Tera};

use super::{describe, CompiledTemplate, TemplateEngine};
use crate::utils::error::{PreviewError, Result};

/// Tera (Jinja2 flavoured). Templates named `*.html` are autoescaped, so
/// layouts write `{{ content | safe }}`. Escaping leaves `/` alone, so path
/// keys such as `ASSET_PATH` print as written.
pub struct TeraEngine {
    base: Tera,
}

impl TeraEngine {
    pub fn new() -> Self {
        TeraEngine { base: base_tera() }
    }
}

fn base_tera() -> Tera {
    let mut tera = Tera::default();
    tera.set_escape_fn(escape_markup);
    tera
}

/// HTML escaping of the characters that can break out of text or an
/// attribute value
fn escape_markup(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for TeraEngine {
    fn name(&self) -> &'static str {
        "tera"
    }

    fn set_partials(&mut self, partials: &BTreeMap<String, String>) -> Result<()> {
        let mut tera = base_tera();
        tera.add_raw_templates(partials.iter().map(|(name, text)| (name.as_str(), text.as_str())))
            .map_err(|e| PreviewError::TemplateCompile {
                name: "partials".to_string(),
                reason: describe(&e),
            })?;
        self.base = tera;
        debug!("Registered {} tera partial(s)", partials.len());
        Ok(())
    }

    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>> {
        let mut tera = self.base.clone();
        tera.add_raw_template(name, source)
            .map_err(|e| PreviewError::TemplateCompile {
                name: name.to_string(),
                reason: describe(&e),
            })?;

        Ok(Box::new(TeraTemplate {
            name: name.to_string(),
            tera: Arc::new(tera),
        }))
    }
}

struct TeraTemplate {
    name: String,
    tera: Arc<Tera>,
}

impl CompiledTemplate for TeraTemplate {
    fn render(&self, context: &Value) -> Result<String> {
        let context = Context::from_value(context.clone()).map_err(|e| PreviewError::TemplateRender {
            name: self.name.clone(),
            reason: describe(&e),
        })?;

        self.tera
            .render(&self.name, &context)
            .map_err(|e| PreviewError::TemplateRender {
                name: self.name.clone(),
                reason: describe(&e),
            })
    }
}
