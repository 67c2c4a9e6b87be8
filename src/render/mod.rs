//! Page rendering for the browser.

pub mod html;

pub use html::render_page;
