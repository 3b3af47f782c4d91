mod absolute_url;
mod date_to_string;
mod relative_url;

use liquid::ParserBuilder;

use crate::config::Config;

pub use absolute_url::AbsoluteUrlFilterParser;
pub use date_to_string::DateToStringFilterParser;
pub use relative_url::RelativeUrlFilterParser;

/// Register the Jekyll filters previews rely on
pub fn register_filters(parser_builder: ParserBuilder, config: &Config) -> ParserBuilder {
    parser_builder
        .filter(RelativeUrlFilterParser {
            base_path: config.base_path.clone(),
        })
        .filter(AbsoluteUrlFilterParser {
            base_path: config.base_path.clone(),
            site_url: config.site_url.clone(),
        })
        .filter(DateToStringFilterParser)
}

/// `base_path` + `path` with exactly one slash between them and a leading `/`
pub(crate) fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_matches('/');
    let path = path.trim_start_matches('/');
    let mut url = if base.is_empty() {
        format!("/{}", path)
    } else {
        format!("/{}/{}", base, path)
    };
    while url.contains("//") {
        url = url.replace("//", "/");
    }
    url
}
