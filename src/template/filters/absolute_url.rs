use std::fmt;

use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{FilterReflection, Result as LiquidResult, Runtime, Value, ValueView};

use super::join_base_path;

/// Prefix a site path with the public site URL and BASE_PATH
#[derive(Debug, Clone)]
pub struct AbsoluteUrlFilter {
    base_path: String,
    site_url: Option<String>,
}

impl liquid_core::Filter for AbsoluteUrlFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> LiquidResult<Value> {
        let path = input.to_kstr();
        let relative = join_base_path(&self.base_path, path.as_str());

        // Without a site URL this degrades to relative_url
        let url = match &self.site_url {
            Some(site_url) => format!("{}{}", site_url.trim_end_matches('/'), relative),
            None => relative,
        };
        Ok(Value::scalar(url))
    }
}

impl fmt::Display for AbsoluteUrlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "absolute_url")
    }
}

#[derive(Debug, Clone)]
pub struct AbsoluteUrlFilterParser {
    pub base_path: String,
    pub site_url: Option<String>,
}

impl FilterReflection for AbsoluteUrlFilterParser {
    fn name(&self) -> &str {
        "absolute_url"
    }

    fn description(&self) -> &str {
        "Creates an absolute URL by prepending the site url and base path to the input"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for AbsoluteUrlFilterParser {
    fn parse(&self, _args: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        Ok(Box::new(AbsoluteUrlFilter {
            base_path: self.base_path.clone(),
            site_url: self.site_url.clone(),
        }))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
