use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::block::Block;

const FENCE: &str = "```";

// `[\s\x1C-\x1F]` is whitespace as in `is_line_space`.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[\s\x1C-\x1F]+(.*)$").expect("Invalid heading regex")
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s\x1C-\x1F]*[-*][\s\x1C-\x1F]+(.*)$").expect("Invalid bullet regex")
});
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s\x1C-\x1F]*\d+\.[\s\x1C-\x1F]+(.*)$").expect("Invalid numbered regex")
});

/// Unicode whitespace plus the ASCII separators `\x1C`..=`\x1F`.
fn is_line_space(c: char) -> bool {
    c.is_whitespace() || ('\x1C'..='\x1F').contains(&c)
}

fn trim_line(text: &str) -> &str {
    text.trim_matches(is_line_space)
}

/// Fence state carried from one line to the next during a single scan.
///
/// Every scan owns its own state, so two documents never interfere.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    in_code_fence: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_code_fence(&self) -> bool {
        self.in_code_fence
    }

    /// Classify one physical line (without its newline).
    ///
    /// Returns `None` for fence marker lines, which open or close a code
    /// block but produce no block of their own.
    pub fn classify(&mut self, line: &str) -> Option<Block> {
        if trim_line(line).starts_with(FENCE) {
            self.in_code_fence = !self.in_code_fence;
            return None;
        }

        if self.in_code_fence {
            return Some(Block::CodeLine {
                text: line.to_string(),
            });
        }

        Some(classify_line(line))
    }
}

/// Classify a line as if no code fence were open.
///
/// Fence markers are not special here; a caller that needs fence
/// handling goes through [`ScanState::classify`].
pub fn classify_line(line: &str) -> Block {
    if let Some(caps) = HEADING.captures(line) {
        return Block::Heading {
            level: caps[1].len() as u8,
            content: trim_line(&caps[2]).to_string(),
        };
    }

    if let Some(caps) = BULLET.captures(line) {
        return Block::BulletItem {
            content: trim_line(&caps[1]).to_string(),
        };
    }

    if let Some(caps) = NUMBERED.captures(line) {
        return Block::NumberedItem {
            content: trim_line(&caps[1]).to_string(),
        };
    }

    if trim_line(line).is_empty() {
        return Block::BlankSeparator;
    }

    Block::Paragraph {
        content: line.to_string(),
    }
}

/// Rewrite `\r\n` and lone `\r` as `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split normalized text into physical lines. A trailing newline ends the
/// last line rather than starting an empty one.
fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut lines = body.split('\n');
    if text.is_empty() {
        // Consume the single empty segment so empty input yields nothing.
        lines.next();
    }
    lines
}

/// Scan a whole document into blocks, one per source line except fence markers.
pub fn scan_blocks(text: &str) -> Vec<Block> {
    let text = normalize_line_endings(text);
    let mut state = ScanState::new();
    let mut blocks = Vec::new();

    for line in physical_lines(&text) {
        if let Some(block) = state.classify(line) {
            blocks.push(block);
        }
    }

    if state.in_code_fence() {
        let trailing = blocks.iter().rev().take_while(|b| b.is_code()).count();
        log::debug!(
            "Unterminated code fence at end of input, keeping {} code line(s)",
            trailing
        );
    }
    log::debug!("Scanned {} block(s)", blocks.len());

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn heading(level: u8, content: &str) -> Block {
        Block::Heading {
            level,
            content: content.into(),
        }
    }

    fn bullet(content: &str) -> Block {
        Block::BulletItem {
            content: content.into(),
        }
    }

    fn numbered(content: &str) -> Block {
        Block::NumberedItem {
            content: content.into(),
        }
    }

    fn code(text: &str) -> Block {
        Block::CodeLine { text: text.into() }
    }

    fn para(content: &str) -> Block {
        Block::Paragraph {
            content: content.into(),
        }
    }

    #[test]
    fn document_with_heading_paragraph_and_code() {
        assert_eq!(
            scan_blocks("# Title\n\nSome *text*.\n\n```\ncode line\n```\n"),
            vec![
                heading(1, "Title"),
                Block::BlankSeparator,
                para("Some *text*."),
                Block::BlankSeparator,
                code("code line"),
            ]
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            scan_blocks("- one\n- two\n1. three\n"),
            vec![bullet("one"), bullet("two"), numbered("three")]
        );
    }

    #[rstest]
    #[case("# One", heading(1, "One"))]
    #[case("###### Six", heading(6, "Six"))]
    #[case("##\tTabbed  ", heading(2, "Tabbed"))]
    #[case("# ", heading(1, ""))]
    #[case("####### Seven", para("####### Seven"))]
    #[case("#NoSpace", para("#NoSpace"))]
    #[case("* star", bullet("star"))]
    #[case("    - indented  ", bullet("indented"))]
    #[case("-no space", para("-no space"))]
    #[case("42. answer", numbered("answer"))]
    #[case("  3.  spaced", numbered("spaced"))]
    #[case("3) paren", para("3) paren"))]
    #[case("", Block::BlankSeparator)]
    #[case(" \t ", Block::BlankSeparator)]
    #[case("  plain text  ", para("  plain text  "))]
    #[case("#\x1cTitle\x1d", heading(1, "Title"))]
    #[case("\x1f- item", bullet("item"))]
    #[case("7.\x1eseven", numbered("seven"))]
    #[case("\x1c \x1f", Block::BlankSeparator)]
    fn classifies_single_lines(#[case] line: &str, #[case] expected: Block) {
        assert_eq!(classify_line(line), expected);
    }

    #[test]
    fn heading_wins_over_list_markers() {
        assert_eq!(classify_line("# - item"), heading(1, "- item"));
    }

    #[test]
    fn code_content_is_not_reinterpreted() {
        assert_eq!(
            scan_blocks("```rust\n# not a heading\n  - not a list\n\n```"),
            vec![code("# not a heading"), code("  - not a list"), code("")]
        );
    }

    #[test]
    fn indented_fence_still_toggles() {
        assert_eq!(
            scan_blocks("  ```\nx\n   ```   \nafter"),
            vec![code("x"), para("after")]
        );
    }

    #[test]
    fn separator_control_chars_count_as_whitespace() {
        assert_eq!(
            scan_blocks("\x1c```\nx\n```\x1f\nafter"),
            vec![code("x"), para("after")]
        );
    }

    #[test]
    fn unterminated_fence_keeps_code_lines() {
        assert_eq!(
            scan_blocks("intro\n```\nfirst\nsecond"),
            vec![para("intro"), code("first"), code("second")]
        );
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(
            scan_blocks("# A\r\n- b\rc\r\n"),
            vec![heading(1, "A"), bullet("b"), para("c")]
        );
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(scan_blocks("").is_empty());
    }

    #[test]
    fn trailing_blank_lines_are_kept() {
        assert_eq!(
            scan_blocks("a\n\n"),
            vec![para("a"), Block::BlankSeparator]
        );
        assert_eq!(scan_blocks("\n"), vec![Block::BlankSeparator]);
    }

    #[test]
    fn state_does_not_leak_between_scans() {
        let _ = scan_blocks("```\nunterminated");
        assert_eq!(scan_blocks("# Fresh"), vec![heading(1, "Fresh")]);
    }

    #[test]
    fn state_can_be_driven_line_by_line() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("```"), None);
        assert!(state.in_code_fence());
        assert_eq!(state.classify("# raw"), Some(code("# raw")));
        assert_eq!(state.classify("```"), None);
        assert!(!state.in_code_fence());
        assert_eq!(state.classify("# raw"), Some(heading(1, "raw")));
    }
}
