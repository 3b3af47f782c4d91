use serde_yaml::{Mapping, Value};

use crate::builder::yaml::yaml_to_json;

/// Front matter for a content resource or layout.
///
/// Fields are kept verbatim as YAML values; only the handful of keys the
/// preview pipeline itself reads get typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    pub fn new(fields: Mapping) -> Self {
        FrontMatter { fields }
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name of the layout that wraps this resource, if any
    pub fn layout(&self) -> Option<&str> {
        self.get_str("layout")
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Explicit slug override
    pub fn slug(&self) -> Option<&str> {
        self.get_str("slug").map(str::trim).filter(|s| !s.is_empty())
    }

    /// Tags, accepting either a sequence or a whitespace separated string
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// All fields as a JSON object
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        match yaml_to_json(Value::Mapping(self.fields.clone())) {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_matter(yaml: &str) -> FrontMatter {
        FrontMatter::new(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_tags_from_sequence_or_string() {
        assert_eq!(front_matter("tags: [rust, web]").tags(), vec!["rust", "web"]);
        assert_eq!(front_matter("tags: rust web").tags(), vec!["rust", "web"]);
        assert_eq!(front_matter("tags: [2024, true]").tags(), vec!["2024", "true"]);
        assert!(front_matter("title: none").tags().is_empty());
    }

    #[test]
    fn test_layout_ignores_null_and_blank() {
        assert_eq!(front_matter("layout: post").layout(), Some("post"));
        assert_eq!(front_matter("layout: null").layout(), None);
        assert_eq!(front_matter("layout: ''").layout(), None);
    }

    #[test]
    fn test_to_json_keeps_every_field() {
        let fm = front_matter("title: Hello\ncount: 3\nnested:\n  key: value\n");
        let json = fm.to_json();

        assert_eq!(json["title"], "Hello");
        assert_eq!(json["count"], 3);
        assert_eq!(json["nested"]["key"], "value");
    }
}
