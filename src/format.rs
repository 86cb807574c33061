//! Inline markup for message content.
//!
//! Bot replies use a tiny markdown subset: `**strong**`, `*emphasis*`,
//! `` `code` `` and hard line breaks.  [`render_markup`] turns content into an
//! immutable [`Rendering`] that renderers walk; it never touches output
//! itself.
//!
//! Delimiters are matched shortest-first within a single line, strong before
//! emphasis before code, and an unmatched delimiter is kept as literal text.

/// Delimiters in matching order.
const DELIMITERS: [&str; 3] = ["**", "*", "`"];

/// One node of formatted content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text.
    Text(String),
    /// `**...**`
    Strong(Vec<Inline>),
    /// `*...*`
    Emphasis(Vec<Inline>),
    /// `` `...` ``
    Code(String),
    /// A newline in the source.
    LineBreak,
}

/// Formatted message content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    inlines: Vec<Inline>,
}

impl Rendering {
    /// The top-level nodes.
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// True if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// The content with all markup removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        push_plain(&self.inlines, &mut out);
        out
    }
}

fn push_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children) | Inline::Emphasis(children) => push_plain(children, out),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

/// Parse message content into a [`Rendering`].
///
/// ```
/// use chatterbox::format::{Inline, render_markup};
///
/// let rendering = render_markup("Hello **there**");
/// assert_eq!(
///     rendering.inlines(),
///     &[
///         Inline::Text("Hello ".to_string()),
///         Inline::Strong(vec![Inline::Text("there".to_string())]),
///     ]
/// );
/// ```
pub fn render_markup(content: &str) -> Rendering {
    let mut inlines = Vec::new();
    for (idx, line) in content.split('\n').enumerate() {
        if idx > 0 {
            inlines.push(Inline::LineBreak);
        }
        parse_spans(line, 0, &mut inlines);
    }
    Rendering { inlines }
}

fn parse_spans(text: &str, level: usize, out: &mut Vec<Inline>) {
    if text.is_empty() {
        return;
    }
    let Some(delim) = DELIMITERS.get(level) else {
        out.push(Inline::Text(text.to_string()));
        return;
    };
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let after_open = &rest[open + delim.len()..];
        let Some(close) = after_open.find(delim) else {
            break;
        };
        parse_spans(&rest[..open], level + 1, out);
        out.push(wrap(level, &after_open[..close]));
        rest = &after_open[close + delim.len()..];
    }
    parse_spans(rest, level + 1, out);
}

fn wrap(level: usize, inner: &str) -> Inline {
    let mut children = Vec::new();
    match level {
        0 => {
            parse_spans(inner, 1, &mut children);
            Inline::Strong(children)
        }
        1 => {
            parse_spans(inner, 2, &mut children);
            Inline::Emphasis(children)
        }
        _ => Inline::Code(inner.to_string()),
    }
}
