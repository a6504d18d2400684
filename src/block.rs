use serde::Serialize;

/// How a run of inline text is styled. Styles are flat, never nested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Plain,
    Bold,
    Italic,
    Code,
}

/// Inline text span with formatting, delimiters already stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::Plain)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, Style::Bold)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text, Style::Italic)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(text, Style::Code)
    }

    /// The markdown delimiter that wraps this span's text, if any.
    pub fn delimiter(&self) -> &'static str {
        match self.style {
            Style::Plain => "",
            Style::Bold => "**",
            Style::Italic => "*",
            Style::Code => "`",
        }
    }
}

/// Line-level elements scanned from Markdown.
///
/// Content of the inline-bearing variants is kept as raw text; it is
/// tokenized into [`Span`]s only when a renderer asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: String,
    },
    BulletItem {
        content: String,
    },
    NumberedItem {
        content: String,
    },
    /// One physical line inside a fenced code block.
    CodeLine {
        text: String,
    },
    BlankSeparator,
    Paragraph {
        content: String,
    },
}

impl Block {
    /// Text that carries inline styling. `CodeLine` is always literal, so it has none.
    pub fn inline_content(&self) -> Option<&str> {
        match self {
            Block::Heading { content, .. }
            | Block::BulletItem { content }
            | Block::NumberedItem { content }
            | Block::Paragraph { content } => Some(content),
            Block::CodeLine { .. } | Block::BlankSeparator => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Block::CodeLine { .. })
    }
}
