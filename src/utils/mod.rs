pub mod logging;
pub mod text;

pub use logging::truncate_text;
pub use text::{sanitize_filename, strip_highlight};
