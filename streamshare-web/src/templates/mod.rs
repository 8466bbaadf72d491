//! HTML templates and page generation

pub mod base;
pub mod landing;
pub mod watch;

pub use base::{base_template, escape_html};
pub use landing::landing_page;
pub use watch::watch_page;
