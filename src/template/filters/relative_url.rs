use std::fmt;

use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{FilterReflection, Result as LiquidResult, Runtime, Value, ValueView};

use super::join_base_path;

/// Prefix a site path with BASE_PATH
#[derive(Debug, Clone)]
pub struct RelativeUrlFilter {
    base_path: String,
}

impl liquid_core::Filter for RelativeUrlFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> LiquidResult<Value> {
        let path = input.to_kstr();
        Ok(Value::scalar(join_base_path(&self.base_path, path.as_str())))
    }
}

impl fmt::Display for RelativeUrlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relative_url")
    }
}

#[derive(Debug, Clone)]
pub struct RelativeUrlFilterParser {
    pub base_path: String,
}

impl FilterReflection for RelativeUrlFilterParser {
    fn name(&self) -> &str {
        "relative_url"
    }

    fn description(&self) -> &str {
        "Prepends the site's base path to the input"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for RelativeUrlFilterParser {
    fn parse(&self, _args: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        Ok(Box::new(RelativeUrlFilter {
            base_path: self.base_path.clone(),
        }))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
