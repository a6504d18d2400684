use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Span, Style};

// Alternation order is the tie-break: at a given start, bold beats italic,
// so `**x**` is never split into two italic runs.
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\*\*(.+?)\*\*|\*(.+?)\*|`(.+?)`").expect("Invalid inline regex")
});

const STYLED_GROUPS: [(usize, Style); 3] = [(1, Style::Bold), (2, Style::Italic), (3, Style::Code)];

/// Split one block's content into flat styled spans.
///
/// Unmatched delimiters stay in the plain text. Text inside a styled span is
/// never re-scanned, so there is no nesting.
pub fn tokenize_inline(content: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some((inner, style)) = STYLED_GROUPS
            .iter()
            .find_map(|&(group, style)| caps.get(group).map(|m| (m.as_str(), style)))
        else {
            continue;
        };

        if whole.start() > last {
            spans.push(Span::plain(&content[last..whole.start()]));
        }
        spans.push(Span::new(inner, style));
        last = whole.end();
    }

    if last < content.len() {
        spans.push(Span::plain(&content[last..]));
    }

    spans
}

/// Inverse of [`tokenize_inline`]: put each span's delimiters back.
pub fn spans_to_markdown(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        let delimiter = span.delimiter();
        out.push_str(delimiter);
        out.push_str(&span.text);
        out.push_str(delimiter);
    }
    out
}

/// Concatenated span text with all styling dropped.
pub fn spans_to_plain(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn bold_is_preferred_over_italic() {
        assert_eq!(
            tokenize_inline("**a** *b*"),
            vec![Span::bold("a"), Span::plain(" "), Span::italic("b")]
        );
    }

    #[test]
    fn unterminated_delimiter_is_literal() {
        assert_eq!(
            tokenize_inline("*unterminated"),
            vec![Span::plain("*unterminated")]
        );
    }

    #[test]
    fn mixed_styles_in_order() {
        assert_eq!(
            tokenize_inline("- **Gras**, *italique*, `code`"),
            vec![
                Span::plain("- "),
                Span::bold("Gras"),
                Span::plain(", "),
                Span::italic("italique"),
                Span::plain(", "),
                Span::code("code"),
            ]
        );
    }

    #[test]
    fn matches_are_shortest() {
        assert_eq!(
            tokenize_inline("*a* and *b*"),
            vec![Span::italic("a"), Span::plain(" and "), Span::italic("b")]
        );
    }

    #[test]
    fn styled_text_is_not_rescanned() {
        assert_eq!(
            tokenize_inline("`**not bold**`"),
            vec![Span::code("**not bold**")]
        );
        assert_eq!(
            tokenize_inline("**has `tick` inside**"),
            vec![Span::bold("has `tick` inside")]
        );
    }

    #[test]
    fn earliest_match_wins_across_kinds() {
        assert_eq!(
            tokenize_inline("`*x*` *y*"),
            vec![Span::code("*x*"), Span::plain(" "), Span::italic("y")]
        );
    }

    #[rstest]
    #[case("**")]
    #[case("``")]
    #[case("*")]
    #[case("a ` b")]
    #[case("no markers at all")]
    fn empty_or_unpaired_delimiters_stay_plain(#[case] content: &str) {
        assert_eq!(tokenize_inline(content), vec![Span::plain(content)]);
    }

    #[test]
    fn triple_asterisk_takes_bold_first() {
        assert_eq!(
            tokenize_inline("***a***"),
            vec![Span::bold("*a"), Span::plain("*")]
        );
    }

    #[test]
    fn four_asterisks_become_italic_asterisk() {
        assert_eq!(
            tokenize_inline("****"),
            vec![Span::italic("*"), Span::plain("*")]
        );
    }

    #[test]
    fn empty_content_has_no_spans() {
        assert!(tokenize_inline("").is_empty());
    }

    #[test]
    fn delimiters_round_trip() {
        let content = "a **b** *c* `d` *e";
        let spans = tokenize_inline(content);
        assert_eq!(spans_to_markdown(&spans), content);
        assert_eq!(spans_to_plain(&spans), "a b c d *e");
    }
}
