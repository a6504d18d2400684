use crate::block::{Block, Span};
use crate::inline::tokenize_inline;

/// Output backend driven by [`render`].
///
/// A renderer only ever sees the block/span model, so adding an output
/// format never touches the scanner or the tokenizer.
pub trait Renderer {
    type Output;

    fn heading(&mut self, level: u8, spans: &[Span]);
    fn bullet_item(&mut self, spans: &[Span]);
    fn numbered_item(&mut self, spans: &[Span]);
    /// A run of consecutive code lines, emitted as literal monospace text.
    fn code_section(&mut self, lines: &[&str]);
    fn blank(&mut self);
    fn paragraph(&mut self, spans: &[Span]);
    fn finish(self) -> Self::Output;
}

/// Walk `blocks` in order and feed them to `renderer`.
///
/// Consecutive `CodeLine`s are grouped into one code section. Inline
/// content is tokenized here, once per block, never for code.
pub fn render<R: Renderer>(blocks: &[Block], mut renderer: R) -> R::Output {
    let mut code: Vec<&str> = Vec::new();

    for block in blocks {
        if let Block::CodeLine { text } = block {
            code.push(text);
            continue;
        }
        if !code.is_empty() {
            renderer.code_section(&code);
            code.clear();
        }

        match block {
            Block::Heading { level, content } => {
                renderer.heading(*level, &tokenize_inline(content));
            }
            Block::BulletItem { content } => renderer.bullet_item(&tokenize_inline(content)),
            Block::NumberedItem { content } => renderer.numbered_item(&tokenize_inline(content)),
            Block::Paragraph { content } => renderer.paragraph(&tokenize_inline(content)),
            Block::BlankSeparator => renderer.blank(),
            Block::CodeLine { .. } => {}
        }
    }

    if !code.is_empty() {
        renderer.code_section(&code);
    }

    renderer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_blocks;
    use pretty_assertions::assert_eq;

    /// Records every callback as a line of text.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Renderer for Trace {
        type Output = Vec<String>;

        fn heading(&mut self, level: u8, spans: &[Span]) {
            self.0.push(format!("h{level} {spans:?}"));
        }
        fn bullet_item(&mut self, spans: &[Span]) {
            self.0.push(format!("bullet {spans:?}"));
        }
        fn numbered_item(&mut self, spans: &[Span]) {
            self.0.push(format!("numbered {spans:?}"));
        }
        fn code_section(&mut self, lines: &[&str]) {
            self.0.push(format!("code {lines:?}"));
        }
        fn blank(&mut self) {
            self.0.push("blank".to_string());
        }
        fn paragraph(&mut self, spans: &[Span]) {
            self.0.push(format!("para {spans:?}"));
        }
        fn finish(self) -> Vec<String> {
            self.0
        }
    }

    #[test]
    fn groups_code_lines_into_sections() {
        let blocks = scan_blocks("```\na\nb\n```\ntext\n```\n*c*\n");
        assert_eq!(
            render(&blocks, Trace::default()),
            vec![
                r#"code ["a", "b"]"#.to_string(),
                format!("para {:?}", vec![Span::plain("text")]),
                r#"code ["*c*"]"#.to_string(),
            ]
        );
    }

    #[test]
    fn tokenizes_inline_content() {
        let blocks = scan_blocks("## **Big**\n\n1. *one*");
        assert_eq!(
            render(&blocks, Trace::default()),
            vec![
                format!("h2 {:?}", vec![Span::bold("Big")]),
                "blank".to_string(),
                format!("numbered {:?}", vec![Span::italic("one")]),
            ]
        );
    }
}
