//! Splitting imported text into labelled sections.
//!
//! Markdown is cut at level-1 and level-2 headings (`# `, `## `); deeper
//! headings stay inside their section. Lines inside fenced code blocks are
//! never treated as headings. Each section keeps its heading line as the
//! first line of its text.

use serde::{Deserialize, Serialize};
use winnow::combinator::{alt, preceded};
use winnow::prelude::*;
use winnow::token::take_till;

/// One labelled chunk of an imported document; becomes one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub text: String,
}

impl Section {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Supported source formats, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// `None` for unsupported extensions.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(DocumentKind::Markdown),
            "txt" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

/// `# Title` or `## Title` → `Title`.
fn heading<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(alt(("## ", "# ")), take_till(0.., '\n'))
        .map(str::trim)
        .parse_next(input)
}

fn heading_title(line: &str) -> Option<&str> {
    let mut rest = line;
    heading.parse_next(&mut rest).ok()
}

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

// ─── Splitters ──────────────────────────────────────────────────────────

/// Split Markdown into sections at `#`/`##` headings.
///
/// Text before the first heading becomes its own section labelled `name`.
/// A document without headings yields one section holding the whole text,
/// unmodified; a blank document yields none.
pub fn split_markdown(name: &str, text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut label = name.to_string();
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut headed = false;

    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        }
        let title = if in_fence { None } else { heading_title(line) };
        match title {
            Some(title) => {
                headed = true;
                flush(&mut sections, &label, &lines);
                label = if title.is_empty() {
                    name.to_string()
                } else {
                    title.to_string()
                };
                lines = vec![line];
            }
            None => lines.push(line),
        }
    }
    if !headed {
        return split_plain_text(name, text);
    }
    flush(&mut sections, &label, &lines);
    sections
}

fn flush(sections: &mut Vec<Section>, label: &str, lines: &[&str]) {
    let text = lines.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        sections.push(Section::new(label, text));
    }
}

/// Plain text is one section holding the whole text (none if blank).
pub fn split_plain_text(name: &str, text: &str) -> Vec<Section> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![Section::new(name, text)]
    }
}
