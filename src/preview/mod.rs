//! Preview generation: the controller that turns a page id into a rendered
//! document, and the service that drives it from page change events.

pub mod controller;
pub mod display;
pub mod service;
pub mod state;

pub use controller::{PreviewController, PreviewInputs};
pub use display::{DisplaySurface, FileSurface, MemorySurface, StdoutSurface};
pub use service::{PreviewService, Snapshot};
pub use state::PreviewState;
