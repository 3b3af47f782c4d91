//! Markdown to HTML conversion for `.md` pages and posts.

use comrak::Options;

/// GitHub Flavored Markdown with raw HTML passed through, since page bodies
/// routinely mix both
pub fn create_comrak_options<'a>() -> Options<'a> {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.tagfilter = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.header_ids = Some("header-".to_string());
    options.extension.footnotes = true;
    options.extension.description_lists = true;

    options.render.hardbreaks = false;
    options.render.github_pre_lang = true;
    options.render.unsafe_ = true;

    options.parse.smart = true;
    options.parse.default_info_string = Some("text".to_string());

    options
}

/// Convert Markdown to HTML
pub fn markdownify(content: &str) -> String {
    comrak::markdown_to_html(content, &create_comrak_options())
}
