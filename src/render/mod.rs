//! Markdown to HTML for the article page.

use serde::Deserialize;

mod basic;
mod full;

pub use basic::render_basic;
pub use full::render_full;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    /// CommonMark with GitHub extensions.
    #[default]
    Full,
    /// Line-oriented converter covering headings, emphasis, links and code.
    Basic,
}

pub fn render_html(markdown: &str, renderer: Renderer) -> String {
    match renderer {
        Renderer::Full => render_full(markdown),
        Renderer::Basic => render_basic(markdown),
    }
}

/// Links leaving the site open in a new tab.
pub(crate) fn is_external(href: &str) -> bool {
    href.starts_with("http") || href.starts_with("//")
}
