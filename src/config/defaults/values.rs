use std::path::PathBuf;

/// Default source directory
pub fn default_source() -> PathBuf {
    PathBuf::from(".")
}

/// Default theme name
pub fn default_theme() -> String {
    "twitter".to_string()
}

/// Default ASSET_PATH template; `{theme}` is replaced with the theme name
pub fn default_asset_path() -> String {
    "/assets/themes/{theme}".to_string()
}

/// Default HOME_PATH
pub fn default_home_path() -> String {
    "/".to_string()
}

/// Default BASE_PATH
pub fn default_base_path() -> String {
    "".to_string()
}

/// Site data file; Jekyll keeps site variables in `_config.yml`
pub fn default_data_file() -> Option<String> {
    Some("_config.yml".to_string())
}

/// Default layouts directory
pub fn default_layouts_dir() -> String {
    "_layouts".to_string()
}

/// Default includes directory
pub fn default_includes_dir() -> String {
    "_includes".to_string()
}

/// Default posts directory
pub fn default_posts_dir() -> String {
    "_posts".to_string()
}

/// Extensions tried when a layout is named without one
pub fn default_layout_extensions() -> Vec<String> {
    vec!["html".to_string()]
}

/// Extensions of pages and posts picked up by directory enumeration
pub fn default_content_extensions() -> Vec<String> {
    vec!["html".to_string(), "md".to_string(), "markdown".to_string()]
}

/// Default markdown extensions
pub fn default_markdown_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

/// Markdown conversion is on unless turned off
pub fn default_markdown() -> bool {
    true
}
