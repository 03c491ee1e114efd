//! Description markup
//!
//! AppStream descriptions are a restricted markup: paragraphs and lists,
//! with `<em>` and `<code>` allowed inside them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline content of a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text(String),
    /// `<em>` emphasised text
    Emphasis(String),
    /// `<code>` literal text
    Code(String),
}

impl Inline {
    /// The text carried by this inline, without markup
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Emphasis(s) | Inline::Code(s) => s,
        }
    }
}

/// A block-level element of a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// `<p>`
    Paragraph(Vec<Inline>),
    /// `<ul>` with its `<li>` items
    UnorderedList(Vec<Vec<Inline>>),
    /// `<ol>` with its `<li>` items
    OrderedList(Vec<Vec<Inline>>),
}

impl Block {
    /// Create a paragraph holding plain text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Inline::Text(text.into())])
    }

    /// Create an unordered list of plain-text items
    pub fn unordered_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::UnorderedList(
            items
                .into_iter()
                .map(|s| vec![Inline::Text(s.into())])
                .collect(),
        )
    }

    /// Returns true if the block carries no visible text
    pub fn is_empty(&self) -> bool {
        match self {
            Block::Paragraph(inlines) => inlines_text(inlines).trim().is_empty(),
            Block::UnorderedList(items) | Block::OrderedList(items) => items.is_empty(),
        }
    }

    /// Returns true if any list item is empty
    pub fn has_empty_item(&self) -> bool {
        match self {
            Block::Paragraph(_) => false,
            Block::UnorderedList(items) | Block::OrderedList(items) => items
                .iter()
                .any(|item| inlines_text(item).trim().is_empty()),
        }
    }
}

/// Join the text of a run of inlines
pub fn inlines_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::text).collect()
}

/// A parsed `<description>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description {
    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl Description {
    /// Create a description from blocks
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Returns true if there is no block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Paragraph texts, in order
    pub fn paragraphs(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(inlines) => Some(inlines_text(inlines)),
                _ => None,
            })
            .collect()
    }

    /// All list item texts, in order, across every list
    pub fn list_items(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| match b {
                Block::UnorderedList(items) | Block::OrderedList(items) => {
                    items.iter().map(|i| inlines_text(i)).collect::<Vec<_>>()
                }
                Block::Paragraph(_) => Vec::new(),
            })
            .collect()
    }

    /// Render as plain text: paragraphs separated by blank lines,
    /// list items prefixed with `- ` or `N. `
    pub fn to_plain_text(&self) -> String {
        let mut parts = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(inlines) => parts.push(inlines_text(inlines)),
                Block::UnorderedList(items) => parts.push(
                    items
                        .iter()
                        .map(|i| format!("- {}", inlines_text(i)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
                Block::OrderedList(items) => parts.push(
                    items
                        .iter()
                        .enumerate()
                        .map(|(n, i)| format!("{}. {}", n + 1, inlines_text(i)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
            }
        }
        parts.join("\n\n")
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain_text())
    }
}
