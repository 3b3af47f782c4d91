use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A whole `{% include ... %}` tag
static INCLUDE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{%(-?)\s*include\s+(\S+?)(\s[^%]*?)?\s*(-?)%\}"#).expect("include tag regex")
});

/// `include.name` inside a partial
static INCLUDE_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binclude\.([A-Za-z_][\w-]*)").expect("include variable regex"));

/// One Jekyll style `key=value` include parameter
static INCLUDE_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*("[^"]*"|'[^']*'|[^\s"']+)"#).expect("include param regex")
});

/// Rewrite Jekyll include syntax into the form the Liquid parser accepts:
/// bare partial names get quoted and `key=value` parameters become
/// `key: value` pairs.
///
/// `{% include nav.html title="Home" %}` -> `{% include "nav.html" title: "Home" %}`
pub fn preprocess_liquid(content: &str) -> String {
    INCLUDE_TAG
        .replace_all(content, |caps: &Captures| {
            let open_trim = &caps[1];
            let name = &caps[2];
            // Dynamic names are left to the parser
            if name.starts_with('{') {
                return caps[0].to_string();
            }
            let params = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");
            let close_trim = &caps[4];

            let name = if is_quoted(name) {
                name.to_string()
            } else {
                format!("\"{}\"", name)
            };

            let params = if params.is_empty() {
                String::new()
            } else if params.contains(':') {
                format!(" {}", params)
            } else {
                let pairs: Vec<String> = INCLUDE_PARAM
                    .captures_iter(params)
                    .map(|p| format!("{}: {}", &p[1], &p[2]))
                    .collect();
                if pairs.is_empty() {
                    String::new()
                } else {
                    format!(" {}", pairs.join(", "))
                }
            };

            format!("{{%{} include {}{} {}%}}", open_trim, name, params, close_trim)
        })
        .into_owned()
}

/// Include parameters are passed as plain variables, so a partial's
/// `include.title` becomes `title`
pub fn preprocess_partial(content: &str) -> String {
    let content = preprocess_liquid(content);
    INCLUDE_VAR.replace_all(&content, "$1").into_owned()
}

fn is_quoted(name: &str) -> bool {
    (name.starts_with('"') && name.ends_with('"')) || (name.starts_with('\'') && name.ends_with('\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_names_are_quoted() {
        assert_eq!(preprocess_liquid("{% include nav.html %}"), r#"{% include "nav.html" %}"#);
        assert_eq!(
            preprocess_liquid("{% include themes/twitter/post.html %}"),
            r#"{% include "themes/twitter/post.html" %}"#
        );
    }

    #[test]
    fn test_quoted_names_are_kept() {
        assert_eq!(preprocess_liquid(r#"{% include "nav.html" %}"#), r#"{% include "nav.html" %}"#);
        assert_eq!(preprocess_liquid("{% include 'nav.html' %}"), "{% include 'nav.html' %}");
    }

    #[test]
    fn test_parameters_become_pairs() {
        assert_eq!(
            preprocess_liquid(r#"{% include card.html title="Hi" count=3 %}"#),
            r#"{% include "card.html" title: "Hi", count: 3 %}"#
        );
    }

    #[test]
    fn test_trim_markers_survive() {
        assert_eq!(preprocess_liquid("{%- include nav.html -%}"), r#"{%- include "nav.html" -%}"#);
    }

    #[test]
    fn test_partial_include_variables() {
        assert_eq!(
            preprocess_partial("<h2>{{ include.title | upcase }}</h2>"),
            "<h2>{{ title | upcase }}</h2>"
        );
    }

    #[test]
    fn test_other_tags_untouched() {
        let text = "{% for post in site.posts %}{{ post.title }}{% endfor %}";
        assert_eq!(preprocess_liquid(text), text);
    }
}
