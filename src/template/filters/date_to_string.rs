use std::fmt;

use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{FilterReflection, Result as LiquidResult, Runtime, Value, ValueView};

use crate::collections::parse_date_str;

/// Jekyll's short date: `05 Mar 2024`
#[derive(Debug, Clone)]
pub struct DateToStringFilter;

impl fmt::Display for DateToStringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "date_to_string")
    }
}

impl liquid_core::Filter for DateToStringFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> LiquidResult<Value> {
        let text = input.to_kstr().to_string();
        match parse_date_str(&text) {
            Some(date) => Ok(Value::scalar(date.format("%d %b %Y").to_string())),
            // Unparseable input passes through
            None => Ok(Value::scalar(text)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateToStringFilterParser;

impl FilterReflection for DateToStringFilterParser {
    fn name(&self) -> &str {
        "date_to_string"
    }

    fn description(&self) -> &str {
        "Formats a date according to Jekyll's date_to_string format (%d %b %Y)"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for DateToStringFilterParser {
    fn parse(&self, _args: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        Ok(Box::new(DateToStringFilter))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
