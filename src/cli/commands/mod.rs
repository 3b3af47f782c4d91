mod render;
mod serve;

pub use render::handle_render_command;
pub use serve::handle_serve_command;
