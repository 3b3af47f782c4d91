use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;

use super::display::DisplaySurface;
use super::state::PreviewState;
use crate::builder::{Payload, PayloadBuilder};
use crate::collections::{PagesDictionary, PostsDictionary};
use crate::config::Config;
use crate::document::Page;
use crate::markdown::markdownify;
use crate::site::{Partials, Site};
use crate::source::ResourceSource;
use crate::template::{create_engine, TemplateEngine};
use crate::utils::error::{PreviewError, Result};

/// Everything one generation reads, fetched together
#[derive(Debug, Clone)]
pub struct PreviewInputs {
    pub page: Page,
    pub site: Site,
    pub partials: Partials,
    pub pages: PagesDictionary,
    pub posts: PostsDictionary,
}

/// Turns a page id into a rendered document.
///
/// A generation fetches its five inputs concurrently, waits for all of
/// them, builds the payload and renders content, then the sub layout, then
/// the master layout. Any failure leaves the previously shown document in
/// place.
pub struct PreviewController {
    config: Arc<Config>,
    source: Arc<dyn ResourceSource>,
    engine: Box<dyn TemplateEngine>,
    builder: PayloadBuilder,
    surfaces: Vec<Box<dyn DisplaySurface>>,
    state: PreviewState,
    page_id: Option<String>,
    output: Option<String>,
    last_error: Option<PreviewError>,
}

impl PreviewController {
    /// Controller with the engine the configuration names
    pub fn new(config: Arc<Config>, source: Arc<dyn ResourceSource>) -> Result<Self> {
        let engine = create_engine(config.template_engine, &config)?;
        Ok(Self::with_engine(config, source, engine))
    }

    pub fn with_engine(
        config: Arc<Config>,
        source: Arc<dyn ResourceSource>,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        PreviewController {
            builder: PayloadBuilder::new(config.clone()),
            config,
            source,
            engine,
            surfaces: Vec::new(),
            state: PreviewState::Idle,
            page_id: None,
            output: None,
            last_error: None,
        }
    }

    /// Also show every rendered document on `surface`
    pub fn add_surface(&mut self, surface: Box<dyn DisplaySurface>) {
        self.surfaces.push(surface);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    /// Last document shown
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Failure of the most recent generation, cleared on success
    pub fn last_error(&self) -> Option<&PreviewError> {
        self.last_error.as_ref()
    }

    /// Move the last failure out, leaving none recorded
    pub fn take_error(&mut self) -> Option<PreviewError> {
        self.last_error.take()
    }

    /// Run one full generation for `page_id`
    pub async fn generate(&mut self, page_id: &str) -> PreviewState {
        self.begin(page_id);
        let inputs = self.fetch_inputs(page_id).await;
        self.apply(page_id, inputs)
    }

    /// Enter `Loading` for `page_id`
    pub fn begin(&mut self, page_id: &str) {
        debug!("Generating preview of {}", page_id);
        self.page_id = Some(page_id.to_string());
        self.state = PreviewState::Loading;
    }

    /// Fetch page, site, partials, pages and posts concurrently. Returns only
    /// once all five have finished; touches no controller state, so it can
    /// be dropped part way.
    pub async fn fetch_inputs(&self, page_id: &str) -> Result<PreviewInputs> {
        let source = self.source.as_ref();
        let config = self.config.as_ref();

        let (page, site, partials, pages, posts) = tokio::join!(
            Page::load(source, config, page_id),
            Site::load(source, config),
            Partials::load(source, config),
            PagesDictionary::load(source, config),
            PostsDictionary::load(source, config),
        );

        Ok(PreviewInputs {
            page: page?,
            site: site?,
            partials: partials?,
            pages: pages?,
            posts: posts?,
        })
    }

    /// Finish a generation from fetched inputs: assemble, render and show
    pub fn apply(&mut self, page_id: &str, inputs: Result<PreviewInputs>) -> PreviewState {
        let inputs = match inputs {
            Ok(inputs) => inputs,
            Err(e) => return self.fail(page_id, e),
        };

        self.state = PreviewState::Assembling;
        let payload = self
            .builder
            .build(&inputs.site, &inputs.page, &inputs.pages, &inputs.posts);

        self.state = PreviewState::Rendering;
        let document = match self.render(&inputs, &payload) {
            Ok(document) => document,
            Err(e) => return self.fail(page_id, e),
        };

        // `output` tracks what is visible, so it moves as soon as any
        // surface took the new document
        let mut shown = self.surfaces.is_empty();
        let mut failure = None;
        for surface in self.surfaces.iter_mut() {
            match surface.show(&document) {
                Ok(()) => shown = true,
                Err(e) => {
                    warn!("Could not show preview of {}: {}", page_id, e);
                    failure.get_or_insert(e);
                }
            }
        }
        if shown {
            self.output = Some(document.clone());
        }
        if let Some(e) = failure {
            return self.fail(page_id, e);
        }

        info!(
            "Rendered {} with {} ({} bytes)",
            page_id,
            self.engine.name(),
            document.len()
        );
        self.last_error = None;
        self.state = PreviewState::Rendered;
        self.state
    }

    /// Content first, then each layout with the previous stage as `content`
    fn render(&mut self, inputs: &PreviewInputs, payload: &Payload) -> Result<String> {
        self.engine.set_partials(&inputs.partials.templates)?;

        let mut context = payload.to_json()?;
        let page = &inputs.page.resource;

        let mut output = self
            .engine
            .compile(&page.url, &page.body)?
            .render(&context)?;

        if self.config.markdown && self.config.is_markdown(&page.url) {
            output = markdownify(&output);
        }

        for layout in inputs.page.layouts() {
            context["content"] = Value::String(output);
            output = self
                .engine
                .compile(&layout.url, &layout.body)?
                .render(&context)?;
        }

        Ok(output)
    }

    fn fail(&mut self, page_id: &str, e: PreviewError) -> PreviewState {
        error!(
            "Preview of {} from {} failed: {}",
            page_id,
            self.source.describe(),
            e
        );
        self.last_error = Some(e);
        self.state = PreviewState::Error;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineKind;
    use crate::preview::display::MemorySurface;
    use crate::source::MemorySource;
    use crate::template::{CompiledTemplate, LiquidEngine};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records the name of everything compiled
    struct CountingEngine {
        inner: LiquidEngine,
        compiled: Arc<Mutex<Vec<String>>>,
    }

    impl TemplateEngine for CountingEngine {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn set_partials(&mut self, partials: &BTreeMap<String, String>) -> Result<()> {
            self.inner.set_partials(partials)
        }

        fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>> {
            self.compiled.lock().unwrap().push(name.to_string());
            self.inner.compile(name, source)
        }
    }

    fn site_files() -> Vec<(&'static str, &'static str)> {
        vec![
            ("_config.yml", "title: Test Blog\n"),
            ("_includes/nav.html", "<nav>{{ site.title }}</nav>"),
            (
                "_layouts/default.html",
                "---\n---\n<html>{% include nav.html %}{{ content }}</html>",
            ),
            (
                "_layouts/post.html",
                "---\nlayout: default\n---\n<article>{{ content }}</article>",
            ),
            ("_layouts/bare.html", "---\n---\n<div>{{ content }}</div>"),
            ("index.html", "---\nlayout: bare\ntitle: Home\n---\n<h1>{{ page.title }}</h1>"),
            ("about.html", "---\nlayout: post\ntitle: About\n---\n<p>{{ page.title }}</p>"),
            ("plain.html", "---\ntitle: Plain\n---\n{{ page.title }}"),
            ("notes.md", "---\nlayout: bare\n---\n# {{ site.title }}"),
            (
                "_posts/2024-01-01-first.md",
                "---\ntitle: First\ntags: [rust]\n---\nfirst post",
            ),
            (
                "_posts/2024-02-01-second.md",
                "---\ntitle: Second\ntags: [rust, web]\n---\nsecond post",
            ),
        ]
    }

    fn source() -> Arc<MemorySource> {
        Arc::new(MemorySource::with_files(site_files()))
    }

    fn controller(source: Arc<MemorySource>) -> (PreviewController, Arc<Mutex<Vec<String>>>) {
        let config = Arc::new(Config::default());
        let compiled = Arc::new(Mutex::new(Vec::new()));
        let engine = CountingEngine {
            inner: LiquidEngine::new(&config).unwrap(),
            compiled: compiled.clone(),
        };
        (
            PreviewController::with_engine(config, source, Box::new(engine)),
            compiled,
        )
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (controller, _) = controller(source());
        assert_eq!(controller.state(), PreviewState::Idle);
        assert!(controller.output().is_none());
    }

    #[tokio::test]
    async fn test_sub_layout_without_master() {
        let (mut controller, compiled) = controller(source());

        let state = controller.generate("index.html").await;
        assert_eq!(state, PreviewState::Rendered);
        assert_eq!(controller.output(), Some("<div><h1>Home</h1></div>"));
        assert_eq!(
            *compiled.lock().unwrap(),
            vec!["index.html", "_layouts/bare.html"]
        );
    }

    #[tokio::test]
    async fn test_sub_and_master_layouts() {
        let (mut controller, compiled) = controller(source());

        controller.generate("about.html").await;
        assert_eq!(
            controller.output(),
            Some("<html><nav>Test Blog</nav><article><p>About</p></article></html>")
        );
        assert_eq!(
            *compiled.lock().unwrap(),
            vec!["about.html", "_layouts/post.html", "_layouts/default.html"]
        );
    }

    #[tokio::test]
    async fn test_page_without_layout_renders_content_only() {
        let (mut controller, _) = controller(source());

        controller.generate("plain.html").await;
        assert_eq!(controller.output(), Some("Plain"));
    }

    #[tokio::test]
    async fn test_markdown_page_is_converted() {
        let (mut controller, _) = controller(source());

        controller.generate("notes.md").await;
        let output = controller.output().unwrap();
        assert!(output.starts_with("<div><h1>"));
        assert!(output.contains("Test Blog</h1>"));
    }

    #[tokio::test]
    async fn test_payload_reaches_templates() {
        let source = source();
        source
            .insert(
                "archive.html",
                "---\n---\n{% for post in _posts_chronological %}{{ post.slug }} {% endfor %}|{{ _tags.web | join: ',' }}|{{ ASSET_PATH }}",
            )
            .await;
        let (mut controller, _) = controller(source);

        controller.generate("archive.html").await;
        assert_eq!(
            controller.output(),
            Some("second first |second|/assets/themes/twitter")
        );
    }

    #[tokio::test]
    async fn test_generate_is_idempotent() {
        let (mut controller, _) = controller(source());

        controller.generate("about.html").await;
        let first = controller.output().map(str::to_string);
        controller.generate("about.html").await;

        assert_eq!(controller.output().map(str::to_string), first);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_output() {
        let source = source();
        let (mut controller, compiled) = controller(source.clone());
        let surface = MemorySurface::new();
        controller.add_surface(Box::new(surface.clone()));

        controller.generate("index.html").await;
        let shown = surface.document();
        let compiles = compiled.lock().unwrap().len();

        source.remove("_posts/2024-01-01-first.md").await;
        source.insert("_posts/2024-03-01-broken.md", "no front matter").await;

        let state = controller.generate("about.html").await;
        assert_eq!(state, PreviewState::Error);
        assert!(matches!(
            controller.last_error(),
            Some(PreviewError::AggregateFailure { collection, .. }) if collection == "posts"
        ));
        assert_eq!(controller.output(), Some("<div><h1>Home</h1></div>"));
        assert_eq!(surface.document(), shown);
        // Nothing was rendered
        assert_eq!(compiled.lock().unwrap().len(), compiles);
    }

    #[tokio::test]
    async fn test_missing_page_is_fetch_error() {
        let (mut controller, _) = controller(source());

        assert_eq!(controller.generate("nope.html").await, PreviewState::Error);
        assert!(controller.last_error().unwrap().is_fetch());
    }

    #[tokio::test]
    async fn test_page_without_front_matter_fails() {
        let source = source();
        source.insert("raw.html", "<p>no header</p>").await;
        let (mut controller, _) = controller(source);

        controller.generate("raw.html").await;
        assert!(matches!(
            controller.last_error(),
            Some(PreviewError::MissingFrontMatter { url }) if url == "raw.html"
        ));
    }

    #[tokio::test]
    async fn test_template_error_enters_error_state() {
        let source = source();
        source.insert("bad.html", "---\n---\n{% if %}").await;
        let (mut controller, _) = controller(source);

        assert_eq!(controller.generate("bad.html").await, PreviewState::Error);
        assert!(matches!(
            controller.last_error(),
            Some(PreviewError::TemplateCompile { name, .. }) if name == "bad.html"
        ));
    }

    #[tokio::test]
    async fn test_error_is_cleared_by_success() {
        let (mut controller, _) = controller(source());

        controller.generate("nope.html").await;
        controller.generate("index.html").await;
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn test_tera_engine() {
        let source = Arc::new(MemorySource::with_files([
            ("_layouts/default.html", "---\n---\n<main>{{ content | safe }}</main>"),
            ("index.html", "---\nlayout: default\ntitle: Home\n---\n<h1>{{ page.title }}</h1>"),
        ]));
        let config = Arc::new(Config {
            template_engine: EngineKind::Tera,
            data_file: None,
            ..Config::default()
        });
        let mut controller = PreviewController::new(config, source).unwrap();

        controller.generate("index.html").await;
        assert_eq!(controller.output(), Some("<main><h1>Home</h1></main>"));
    }

    struct BrokenSurface;

    impl DisplaySurface for BrokenSurface {
        fn show(&mut self, _document: &str) -> Result<()> {
            Err(PreviewError::Surface("display went away".to_string()))
        }
    }

    #[tokio::test]
    async fn test_output_follows_surfaces_that_took_the_document() {
        let (mut controller, _) = controller(source());
        let surface = MemorySurface::new();
        controller.add_surface(Box::new(surface.clone()));
        controller.add_surface(Box::new(BrokenSurface));

        let state = controller.generate("plain.html").await;
        assert_eq!(state, PreviewState::Error);
        assert!(matches!(controller.last_error(), Some(PreviewError::Surface(_))));
        assert_eq!(surface.document().as_deref(), Some("Plain"));
        assert_eq!(controller.output(), surface.document().as_deref());
    }

    #[tokio::test]
    async fn test_output_kept_when_no_surface_took_the_document() {
        let (mut controller, _) = controller(source());
        controller.generate("plain.html").await;
        controller.add_surface(Box::new(BrokenSurface));

        assert_eq!(controller.generate("index.html").await, PreviewState::Error);
        assert_eq!(controller.output(), Some("Plain"));
    }

    #[tokio::test]
    async fn test_post_previewed_directly_matches_posts_index() {
        let source = source();
        source
            .insert(
                "_layouts/dated.html",
                "---\n---\n{{ page.slug }}|{{ page.date }}|{{ _posts.first.slug }}|{{ content }}",
            )
            .await;
        source
            .insert(
                "_posts/2024-01-01-first.md",
                "---\nlayout: dated\ntitle: First\n---\nfirst post",
            )
            .await;
        let (mut controller, _) = controller(source);

        let state = controller.generate("_posts/2024-01-01-first.md").await;
        assert_eq!(state, PreviewState::Rendered);
        let output = controller.output().unwrap();
        assert!(output.starts_with("first|2024-01-01 00:00:00|first|"));
        assert!(output.contains("<p>first post</p>"));
    }

    #[tokio::test]
    async fn test_tera_engine_reads_payload_indexes() {
        let source = Arc::new(MemorySource::with_files([
            (
                "_posts/2024-01-01-a.md",
                "---\ntitle: A\ntags: [rust]\n---\na",
            ),
            (
                "_posts/2024-02-01-b.md",
                "---\ntitle: B\ntags: [rust, web]\n---\nb",
            ),
            (
                "archive.html",
                "---\n---\n{% for post in _posts_chronological %}{{ post.title }}{% endfor %}|{{ _tags.web | length }}|{{ _tags.rust | join(sep=\",\") }}|{{ ASSET_PATH | safe }}",
            ),
        ]));
        let config = Arc::new(Config {
            template_engine: EngineKind::Tera,
            data_file: None,
            ..Config::default()
        });
        let mut controller = PreviewController::new(config, source).unwrap();

        assert_eq!(controller.generate("archive.html").await, PreviewState::Rendered);
        assert_eq!(
            controller.output(),
            Some("BA|1|a,b|/assets/themes/twitter")
        );
    }
}
