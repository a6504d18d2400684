use crate::block::Span;
use crate::inline::spans_to_markdown;
use crate::render::Renderer;

/// Rebuilds normalized markdown text from the block model.
///
/// Bullets become `- `, numbered items are renumbered from 1 per run, and
/// code sections get a plain fence. Re-scanning the output yields the same
/// block kinds in the same order.
#[derive(Default)]
pub struct MarkdownRenderer {
    out: String,
    next_number: usize,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, prefix: &str, spans: &[Span]) {
        self.out.push_str(prefix);
        self.out.push_str(&spans_to_markdown(spans));
        self.out.push('\n');
    }
}

impl Renderer for MarkdownRenderer {
    type Output = String;

    fn heading(&mut self, level: u8, spans: &[Span]) {
        self.next_number = 0;
        let prefix = format!("{} ", "#".repeat(level as usize));
        self.line(&prefix, spans);
    }

    fn bullet_item(&mut self, spans: &[Span]) {
        self.next_number = 0;
        self.line("- ", spans);
    }

    fn numbered_item(&mut self, spans: &[Span]) {
        self.next_number += 1;
        let prefix = format!("{}. ", self.next_number);
        self.line(&prefix, spans);
    }

    fn code_section(&mut self, lines: &[&str]) {
        self.next_number = 0;
        self.out.push_str("```\n");
        for line in lines {
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str("```\n");
    }

    fn blank(&mut self) {
        self.next_number = 0;
        self.out.push('\n');
    }

    fn paragraph(&mut self, spans: &[Span]) {
        self.next_number = 0;
        self.line("", spans);
    }

    fn finish(self) -> String {
        self.out
    }
}
