use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::utils::path::{get_extension, join_address, normalize_address};

/// Template engine used to render content and layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Liquid, Jekyll's own template language
    #[default]
    Liquid,
    /// Tera (Jinja2 flavoured)
    Tera,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Liquid => write!(f, "liquid"),
            EngineKind::Tera => write!(f, "tera"),
        }
    }
}

/// Preview configuration.
///
/// Resolved once when a preview session starts and shared read-only
/// (`Arc<Config>`) by every component for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site source directory, used when no `base_url` is set
    #[serde(default = "defaults::default_source")]
    pub source: PathBuf,

    /// Fetch resources over HTTP from this URL instead of the filesystem
    #[serde(default)]
    pub base_url: Option<String>,

    /// Theme name, substituted into `asset_path`
    #[serde(default = "defaults::default_theme")]
    pub theme: String,

    /// Template for ASSET_PATH
    #[serde(default = "defaults::default_asset_path")]
    pub asset_path: String,

    /// HOME_PATH exposed to templates
    #[serde(default = "defaults::default_home_path")]
    pub home_path: String,

    /// BASE_PATH exposed to templates and used by `relative_url`
    #[serde(default = "defaults::default_base_path")]
    pub base_path: String,

    /// Public site URL used by `absolute_url`
    #[serde(default)]
    pub site_url: Option<String>,

    /// YAML file holding site variables; `None` disables it
    #[serde(default = "defaults::default_data_file")]
    pub data_file: Option<String>,

    /// Layouts directory
    #[serde(default = "defaults::default_layouts_dir")]
    pub layouts_dir: String,

    /// Includes (partials) directory
    #[serde(default = "defaults::default_includes_dir")]
    pub includes_dir: String,

    /// Posts directory
    #[serde(default = "defaults::default_posts_dir")]
    pub posts_dir: String,

    /// Page addresses; enumerated from the source when empty
    #[serde(default)]
    pub pages: Vec<String>,

    /// Post addresses; enumerated from `posts_dir` when empty
    #[serde(default)]
    pub posts: Vec<String>,

    /// Partial names relative to `includes_dir`; enumerated when empty
    #[serde(default)]
    pub partials: Vec<String>,

    /// Extensions tried for layouts named without one
    #[serde(default = "defaults::default_layout_extensions")]
    pub layout_extensions: Vec<String>,

    /// Extensions of enumerated pages and posts
    #[serde(default = "defaults::default_content_extensions")]
    pub content_extensions: Vec<String>,

    /// Template engine
    #[serde(default)]
    pub template_engine: EngineKind,

    /// Convert rendered Markdown pages to HTML
    #[serde(default = "defaults::default_markdown")]
    pub markdown: bool,

    /// Markdown extensions
    #[serde(default = "defaults::default_markdown_extensions")]
    pub markdown_ext: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: defaults::default_source(),
            base_url: None,
            theme: defaults::default_theme(),
            asset_path: defaults::default_asset_path(),
            home_path: defaults::default_home_path(),
            base_path: defaults::default_base_path(),
            site_url: None,
            data_file: defaults::default_data_file(),
            layouts_dir: defaults::default_layouts_dir(),
            includes_dir: defaults::default_includes_dir(),
            posts_dir: defaults::default_posts_dir(),
            pages: Vec::new(),
            posts: Vec::new(),
            partials: Vec::new(),
            layout_extensions: defaults::default_layout_extensions(),
            content_extensions: defaults::default_content_extensions(),
            template_engine: EngineKind::default(),
            markdown: defaults::default_markdown(),
            markdown_ext: defaults::default_markdown_extensions(),
        }
    }
}

impl Config {
    /// ASSET_PATH with the theme substituted
    pub fn theme_path(&self) -> String {
        self.asset_path.replace("{theme}", &self.theme)
    }

    /// Address of a page from its identifier
    pub fn page_path(&self, id: &str) -> String {
        normalize_address(id)
    }

    /// Addresses to try, in order, for a layout name
    pub fn layout_candidates(&self, name: &str) -> Vec<String> {
        let exact = join_address(&self.layouts_dir, name);
        let mut candidates = vec![exact.clone()];
        if get_extension(name).is_none() {
            for ext in &self.layout_extensions {
                candidates.push(format!("{}.{}", exact, ext.trim_start_matches('.')));
            }
        }
        candidates
    }

    /// Address of a partial
    pub fn partial_path(&self, name: &str) -> String {
        join_address(&self.includes_dir, name)
    }

    /// Whether an address names a Markdown file
    pub fn is_markdown(&self, address: &str) -> bool {
        has_any_extension(address, &self.markdown_ext)
    }

    /// Whether an address is a post: listed in `posts`, or inside `posts_dir`
    pub fn is_post(&self, address: &str) -> bool {
        let address = normalize_address(address);
        if self.posts.iter().any(|post| normalize_address(post) == address) {
            return true;
        }
        let dir = normalize_address(&self.posts_dir);
        !dir.is_empty() && address.starts_with(&format!("{}/", dir))
    }

    /// Whether an address has one of the enumerated content extensions
    pub fn is_content(&self, address: &str) -> bool {
        has_any_extension(address, &self.content_extensions)
    }
}

fn has_any_extension(address: &str, extensions: &[String]) -> bool {
    match get_extension(address) {
        Some(ext) => extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}
