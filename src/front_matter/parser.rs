use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::front_matter::types::FrontMatter;
use crate::utils::error::PreviewError;

/// Opening delimiter, which must be the very first line
static OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\x{FEFF}?---[ \t]*\r?\n").expect("opening delimiter regex"));

/// Closing delimiter: the first later line made of `---` alone
static CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^---[ \t]*(?:\r?\n|\z)").expect("closing delimiter regex"));

/// Why a header block could not be read. Carries no address; callers attach
/// one with [`FrontMatterError::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontMatterError {
    #[error("missing front matter")]
    Missing,
    #[error("malformed front matter: {0}")]
    Malformed(String),
}

impl FrontMatterError {
    pub fn at(self, url: &str) -> PreviewError {
        match self {
            FrontMatterError::Missing => PreviewError::MissingFrontMatter { url: url.to_string() },
            FrontMatterError::Malformed(reason) => PreviewError::MalformedFrontMatter {
                url: url.to_string(),
                reason,
            },
        }
    }
}

/// Split raw text into the YAML between the delimiters and the body after the
/// closing delimiter line. `None` when either delimiter is absent.
pub fn split(raw: &str) -> Option<(&str, &str)> {
    let opening = OPENING.find(raw)?;
    let rest = &raw[opening.end()..];
    let closing = CLOSING.find(rest)?;
    Some((&rest[..closing.start()], &rest[closing.end()..]))
}

/// Parse front matter and return it with the remaining body
pub fn parse(raw: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let (block, body) = split(raw).ok_or(FrontMatterError::Missing)?;
    let fields = parse_mapping(block)?;
    Ok((FrontMatter::new(fields), body))
}

/// Parse a plain YAML data file (no delimiters) that must hold a mapping
pub fn parse_data(raw: &str) -> Result<Mapping, FrontMatterError> {
    parse_mapping(raw)
}

fn parse_mapping(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => Ok(map),
        // A block holding only comments
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(other) => Err(FrontMatterError::Malformed(format!(
            "expected key: value pairs, found {}",
            kind_of(&other)
        ))),
        Err(e) => Err(FrontMatterError::Malformed(e.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
