// src/core/cell_text.rs
//! Cell markup → clean text lines.
//!
//! `<br>` and literal newlines split lines, every other tag is dropped, entities
//! are decoded by the HTML parser, each line is trimmed and loses trailing
//! footnote markers (`[1]`), and empty lines disappear.

use scraper::{Html, Node};

use super::sanitize::strip_footnotes;

pub fn lines_from_markup(markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(markup);
    let mut text = String::with_capacity(markup.len());

    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }

    normalize_lines(text.lines())
}

/// Trim, strip footnotes, drop empties. Applying it twice changes nothing.
pub fn normalize_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| strip_footnotes(l.as_ref()).to_owned())
        .filter(|l| !l.is_empty())
        .collect()
}
