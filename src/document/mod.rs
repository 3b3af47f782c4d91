//! Single fetched resources: content files, layouts and the page being
//! previewed together with its layout chain.

mod page;
mod resource;

pub use page::Page;
pub use resource::{Record, Resource};
