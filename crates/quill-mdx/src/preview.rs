//! Engine-backed Markdown renderer for the richer preview variant.

use pulldown_cmark::{html, Options, Parser};

/// Render a Markdown/MDX body to HTML with a standards-compliant engine.
///
/// Unlike [`crate::render::render`], this variant wraps paragraphs and list
/// containers properly; it backs the server-side preview endpoint.
pub fn render_rich(body: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(body, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
