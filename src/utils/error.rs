use std::io;
use thiserror::Error;

/// Common result type for preview operations
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Error types for preview operations
#[derive(Debug, Error)]
pub enum PreviewError {
    /// A resource could not be retrieved from its source
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The resource has no `---` delimited header block
    #[error("Missing front matter in {url}")]
    MissingFrontMatter { url: String },

    /// The header block exists but is not a YAML mapping
    #[error("Malformed front matter in {url}: {reason}")]
    MalformedFrontMatter { url: String, reason: String },

    /// Template syntax error
    #[error("Failed to compile template {name}: {reason}")]
    TemplateCompile { name: String, reason: String },

    /// Template evaluation error (unknown filter, bad partial, ...)
    #[error("Failed to render template {name}: {reason}")]
    TemplateRender { name: String, reason: String },

    /// At least one member of a fan-in failed
    #[error("{} resource(s) in {collection} failed to load: {}", .failures.len(), summarize(.failures))]
    AggregateFailure {
        collection: String,
        failures: Vec<PreviewError>,
    },

    /// The rendered document could not be shown
    #[error("Failed to display preview: {0}")]
    Surface(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload could not be turned into a render context
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No generation for the page finished in time
    #[error("Timed out waiting for preview of {page}")]
    Timeout { page: String },

    /// The preview worker has shut down
    #[error("Preview service stopped")]
    ServiceStopped,

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PreviewError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        PreviewError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures to retrieve a resource, as opposed to failures to
    /// understand one.
    pub fn is_fetch(&self) -> bool {
        matches!(self, PreviewError::Fetch { .. })
    }
}

fn summarize(failures: &[PreviewError]) -> String {
    failures
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
