use std::fmt;

use serde::Serialize;

/// Where the controller is in a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting on page, site, partials, pages and posts
    Loading,
    /// Building the payload
    Assembling,
    /// Running content and layouts through the engine
    Rendering,
    Rendered,
    Error,
}

impl PreviewState {
    /// True once a generation has finished one way or the other
    pub fn is_terminal(&self) -> bool {
        matches!(self, PreviewState::Rendered | PreviewState::Error)
    }
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreviewState::Idle => "idle",
            PreviewState::Loading => "loading",
            PreviewState::Assembling => "assembling",
            PreviewState::Rendering => "rendering",
            PreviewState::Rendered => "rendered",
            PreviewState::Error => "error",
        };
        write!(f, "{}", name)
    }
}
