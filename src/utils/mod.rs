//! Shared utility functions.
//!
//! - `html`: text and attribute helpers over parsed markup
//! - `url`: resolving scraped links against the page they came from

mod html;
mod url;

pub use html::{element_text, first_attr, first_text};
pub use url::resolve_link;
