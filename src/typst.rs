use crate::block::{Span, Style};
use crate::config::Config;
use crate::render::Renderer;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

struct ListBuffer {
    kind: ListKind,
    items: Vec<String>,
}

/// Renders blocks to Typst markup
pub struct TypstRenderer<'a> {
    config: &'a Config,
    out: String,
    list: Option<ListBuffer>,
    // A heading's unbreakable block, waiting for its first content unit.
    keep_open: bool,
}

impl<'a> TypstRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        let mut out = String::new();
        emit_preamble(config, &mut out);
        Self {
            config,
            out,
            list: None,
            keep_open: false,
        }
    }

    /// Append a finished unit of markup, closing a pending heading block after it.
    fn emit_unit(&mut self, markup: &str) {
        self.out.push_str(markup);
        if self.keep_open {
            self.out.push_str("]\n\n");
            self.keep_open = false;
        }
    }

    fn emit_heading(&mut self, level: u8, spans: &[Span]) {
        let mut markup = String::new();
        for _ in 0..level {
            markup.push('=');
        }
        markup.push(' ');
        spans_to_typst(spans, &mut markup);
        markup.push_str("\n\n");

        if !self.config.layout.keep_heading_with_next {
            self.out.push_str(&markup);
            return;
        }

        // Back-to-back headings: the previous one stands alone.
        if self.keep_open {
            self.out.push_str("]\n\n");
        }
        self.out.push_str("#block(breakable: false)[\n");
        self.out.push_str(&markup);
        self.keep_open = true;
    }

    fn push_list_item(&mut self, kind: ListKind, spans: &[Span]) {
        if self.list.as_ref().is_some_and(|list| list.kind != kind) {
            self.flush_list();
        }
        let mut item = String::new();
        spans_to_typst(spans, &mut item);
        self.list
            .get_or_insert_with(|| ListBuffer {
                kind,
                items: Vec::new(),
            })
            .items
            .push(item);
    }

    fn flush_list(&mut self) {
        let Some(list) = self.list.take() else {
            return;
        };
        let prefix = match list.kind {
            ListKind::Bullet => "-",
            ListKind::Numbered => "+",
        };

        let mut markup = String::new();
        for item in &list.items {
            markup.push_str(prefix);
            markup.push(' ');
            markup.push_str(item);
            markup.push('\n');
        }

        // Keep short lists together, allow breaks in long ones
        if list.items.len() <= self.config.layout.keep_list_max {
            self.emit_unit(&format!("#block(breakable: false)[\n{markup}]\n\n"));
        } else {
            markup.push('\n');
            self.emit_unit(&markup);
        }
    }
}

impl Renderer for TypstRenderer<'_> {
    type Output = String;

    fn heading(&mut self, level: u8, spans: &[Span]) {
        self.flush_list();
        self.emit_heading(level, spans);
    }

    fn bullet_item(&mut self, spans: &[Span]) {
        self.push_list_item(ListKind::Bullet, spans);
    }

    fn numbered_item(&mut self, spans: &[Span]) {
        self.push_list_item(ListKind::Numbered, spans);
    }

    fn code_section(&mut self, lines: &[&str]) {
        self.flush_list();
        let fence = code_fence_for(lines);
        let mut markup = String::from("#block(breakable: false)[\n");
        markup.push_str(&fence);
        markup.push('\n');
        for line in lines {
            markup.push_str(line);
            markup.push('\n');
        }
        markup.push_str(&fence);
        markup.push_str("\n]\n\n");
        self.emit_unit(&markup);
    }

    fn blank(&mut self) {
        self.flush_list();
    }

    fn paragraph(&mut self, spans: &[Span]) {
        self.flush_list();
        let mut markup = String::new();
        spans_to_typst(spans, &mut markup);
        markup.push_str("\n\n");
        self.emit_unit(&markup);
    }

    fn finish(mut self) -> String {
        self.flush_list();
        if self.keep_open {
            self.out.push_str("]\n\n");
        }
        self.out
    }
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str(&format!("#set page(paper: {}", typst_string(&config.page.paper)));
    if config.page.numbers {
        out.push_str(", numbering: \"1\"");
    }
    out.push_str(")\n");

    out.push_str("#set text(");
    if let Some(family) = &config.font.family {
        out.push_str(&format!("font: {}, ", typst_string(family)));
    }
    out.push_str(&format!("size: {}pt)\n", config.font.size));

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    out.push_str(&format!(
        "#show raw: set text(font: {}, size: {}pt)\n\n",
        typst_string(&config.code.font),
        config.code.size
    ));
}

/// A raw-block fence longer than any backtick run inside the code.
fn code_fence_for(lines: &[&str]) -> String {
    let longest = lines
        .iter()
        .flat_map(|line| line.split(|c: char| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

fn typst_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_typst(span, out);
    }
}

fn span_to_typst(span: &Span, out: &mut String) {
    // Whitespace-only emphasis has nothing to emphasize.
    if span.style != Style::Code && span.text.trim().is_empty() {
        escape_text(&span.text, out);
        return;
    }

    match span.style {
        Style::Plain => escape_text(&span.text, out),
        // `*`/`_` markup only works at word boundaries, so use the functions.
        // The `;` ends the call before any following `(`, `[` or `.`.
        Style::Bold => {
            out.push_str("#strong[");
            escape_text(&span.text, out);
            out.push_str("];");
        }
        Style::Italic => {
            out.push_str("#emph[");
            escape_text(&span.text, out);
            out.push_str("];");
        }
        Style::Code => {
            if span.text.contains('`') {
                out.push_str("#raw(");
                out.push_str(&typst_string(&span.text));
                out.push_str(");");
            } else {
                out.push('`');
                out.push_str(&span.text);
                out.push('`');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    // Escape special Typst characters
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '+' | '-'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}
