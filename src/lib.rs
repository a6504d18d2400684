//! Compile a small Markdown subset (headings, `-`/`*` and `1.` list items,
//! fenced code, paragraphs, `**bold**`, `*italic*` and `` `code` ``) into a
//! flat block/span model, and render that model to Typst, PDF, SVG, HTML or
//! normalized Markdown.

mod block;
pub mod config;
pub mod document;
pub mod export;
mod html;
mod inline;
mod markdown;
mod render;
mod scanner;
mod typst;

pub use block::{Block, Span, Style};
pub use config::Config;
pub use export::{ExportError, ExportFormat, SvgDocument};
pub use html::HtmlRenderer;
pub use inline::{spans_to_markdown, spans_to_plain, tokenize_inline};
pub use markdown::MarkdownRenderer;
pub use render::{Renderer, render};
pub use scanner::{ScanState, classify_line, normalize_line_endings, scan_blocks};
pub use typst::TypstRenderer;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    scan_blocks(markdown)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    render(&blocks, TypstRenderer::new(config))
}

/// Convert markdown to a standalone HTML page using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to a standalone HTML page with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    render(&blocks, HtmlRenderer::new(config))
}

/// Rebuild markdown with normalized markers from the parsed blocks.
pub fn markdown_to_markdown(markdown: &str) -> String {
    render(&parse(markdown), MarkdownRenderer::new())
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, ExportError> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    let doc = export::compile_document(markdown_to_typst_with_config(markdown, config))?;
    export::document_to_pdf(&doc)
}

/// Convert markdown to SVG pages using default config.
pub fn markdown_to_svg(markdown: &str) -> Result<SvgDocument, ExportError> {
    markdown_to_svg_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to SVG pages with custom config.
pub fn markdown_to_svg_with_config(
    markdown: &str,
    config: &Config,
) -> Result<SvgDocument, ExportError> {
    let doc = export::compile_document(markdown_to_typst_with_config(markdown, config))?;
    Ok(export::document_to_svg(&doc))
}
