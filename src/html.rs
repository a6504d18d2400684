use html_escape::encode_text;

use crate::block::{Span, Style};
use crate::config::Config;
use crate::inline::spans_to_plain;
use crate::render::Renderer;

/// Renders blocks to a standalone HTML page
pub struct HtmlRenderer<'a> {
    config: &'a Config,
    body: String,
    open_list: Option<&'static str>,
    title: Option<String>,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            body: String::new(),
            open_list: None,
            title: None,
        }
    }

    fn open_list(&mut self, tag: &'static str) {
        if self.open_list == Some(tag) {
            return;
        }
        self.close_list();
        self.body.push_str(&format!("<{tag}>\n"));
        self.open_list = Some(tag);
    }

    fn close_list(&mut self) {
        if let Some(tag) = self.open_list.take() {
            self.body.push_str(&format!("</{tag}>\n"));
        }
    }

    fn list_item(&mut self, tag: &'static str, spans: &[Span]) {
        self.open_list(tag);
        self.body.push_str("<li>");
        spans_to_html(spans, &mut self.body);
        self.body.push_str("</li>\n");
    }
}

impl Renderer for HtmlRenderer<'_> {
    type Output = String;

    fn heading(&mut self, level: u8, spans: &[Span]) {
        self.close_list();
        if self.title.is_none() {
            self.title = Some(spans_to_plain(spans));
        }
        self.body.push_str(&format!("<h{level}>"));
        spans_to_html(spans, &mut self.body);
        self.body.push_str(&format!("</h{level}>\n"));
    }

    fn bullet_item(&mut self, spans: &[Span]) {
        self.list_item("ul", spans);
    }

    fn numbered_item(&mut self, spans: &[Span]) {
        self.list_item("ol", spans);
    }

    fn code_section(&mut self, lines: &[&str]) {
        self.close_list();
        self.body.push_str("<pre><code>");
        for line in lines {
            self.body.push_str(&encode_text(line));
            self.body.push('\n');
        }
        self.body.push_str("</code></pre>\n");
    }

    fn blank(&mut self) {
        self.close_list();
    }

    fn paragraph(&mut self, spans: &[Span]) {
        self.close_list();
        self.body.push_str("<p>");
        spans_to_html(spans, &mut self.body);
        self.body.push_str("</p>\n");
    }

    fn finish(mut self) -> String {
        self.close_list();
        let title = match &self.title {
            Some(title) if !title.trim().is_empty() => title.as_str(),
            _ => self.config.html.title.as_str(),
        };

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", encode_text(title)));
        out.push_str(&format!(
            "<style>\nbody {{ font-size: {}pt; }}\npre, code {{ font-family: \"{}\", monospace; font-size: {}pt; }}\n</style>\n",
            self.config.font.size,
            encode_text(&self.config.code.font),
            self.config.code.size
        ));
        out.push_str("</head>\n<body>\n");
        out.push_str(&self.body);
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        let text = encode_text(&span.text);
        match span.style {
            Style::Plain => out.push_str(&text),
            Style::Bold => out.push_str(&format!("<strong>{text}</strong>")),
            Style::Italic => out.push_str(&format!("<em>{text}</em>")),
            Style::Code => out.push_str(&format!("<code>{text}</code>")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::markdown_to_html;
    use pretty_assertions::assert_eq;

    fn body(html: &str) -> &str {
        let start = html.find("<body>\n").unwrap() + "<body>\n".len();
        let end = html.find("</body>").unwrap();
        &html[start..end]
    }

    #[test]
    fn document_structure() {
        let html = markdown_to_html("# Title\n\nSome *text*.\n\n```\ncode line\n```\n");
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains("<title>Title</title>"));
        assert_eq!(
            body(&html),
            "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n<pre><code>code line\n</code></pre>\n"
        );
    }

    #[test]
    fn lists_open_and_close() {
        let html = markdown_to_html("- one\n- **two**\n1. three\n\n- four");
        assert_eq!(
            body(&html),
            "<ul>\n<li>one</li>\n<li><strong>two</strong></li>\n</ul>\n<ol>\n<li>three</li>\n</ol>\n<ul>\n<li>four</li>\n</ul>\n"
        );
    }

    #[test]
    fn escapes_text_and_code() {
        let html = markdown_to_html("a < b & `<tag>`\n```\nif a < b {}\n```");
        assert_eq!(
            body(&html),
            "<p>a &lt; b &amp; <code>&lt;tag&gt;</code></p>\n<pre><code>if a &lt; b {}\n</code></pre>\n"
        );
    }

    #[test]
    fn title_falls_back_to_config() {
        let mut config = Config::default();
        config.html.title = "Notes".to_string();
        let html = crate::markdown_to_html_with_config("just text", &config);
        assert!(html.contains("<title>Notes</title>"));
    }
}
