//! Assembly of the render context handed to the template engine.

pub mod payload;
pub mod yaml;

pub use payload::{Payload, PayloadBuilder};
