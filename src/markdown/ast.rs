/// A parsed post body: paragraphs separated by blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Document {
    pub paragraphs: Vec<Paragraph>,
}

/// Blocks of one paragraph, in source order. Blocks that shared a source
/// line sit next to each other; a single newline between them is a `Break`.
pub(crate) type Paragraph = Vec<Block>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    /// Fenced code, body kept verbatim
    Code {
        language: Option<String>,
        code: String,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Quote(Vec<Inline>),
    /// `* ` item; consecutive items render inside one list
    ListItem(Vec<Inline>),
    Line(Vec<Inline>),
    /// A single newline in the source
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inline {
    /// Source text, including raw HTML, emitted as is
    Text(String),
    Code(String),
    Image {
        alt: String,
        url: String,
    },
    Link {
        content: Vec<Inline>,
        url: String,
    },
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
}
