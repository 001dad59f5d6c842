//! Terminal presentation helpers

mod markdown;

pub use markdown::{render_markdown, render_markdown_text};
