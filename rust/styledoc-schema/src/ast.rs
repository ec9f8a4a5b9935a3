//! The typed, immutable document tree produced by the parser and consumed by
//! the renderer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::units::HeadingLevel;

/// Document-level identity fields, set from front matter or AI-recognized
/// leading paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub author: Option<String>,
    pub advisor: Option<String>,
    pub program: Option<String>,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

/// A single formatted run within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Bold { text: String },
    Italic { text: String },
    Underline { text: String },
    Superscript { text: String },
    Subscript { text: String },
    Code { text: String },
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text { text }
            | Inline::Bold { text }
            | Inline::Italic { text }
            | Inline::Underline { text }
            | Inline::Superscript { text }
            | Inline::Subscript { text }
            | Inline::Code { text } => text,
        }
    }
}

/// The content of a paragraph-like block: either plain text or a sequence of
/// formatted runs. Exactly one variant is populated by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParagraphContent {
    Text(String),
    Inlines(Vec<Inline>),
}

impl ParagraphContent {
    pub fn plain_text(&self) -> String {
        match self {
            ParagraphContent::Text(text) => text.clone(),
            ParagraphContent::Inlines(inlines) => {
                inlines.iter().map(Inline::text).collect::<Vec<_>>().join("")
            }
        }
    }
}

/// A row of table cell strings.
pub type TableRow = Vec<String>;

/// A single tagged block of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Paragraph {
        content: ParagraphContent,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
    Table {
        rows: Vec<TableRow>,
        caption: Option<String>,
    },
    Figure {
        src: String,
        caption: Option<String>,
    },
    PageBreak,
    SectionBreak {
        next_page: bool,
    },
    Bibliography {
        items: Vec<String>,
    },
}

/// The root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocAst {
    #[serde(default)]
    pub meta: DocumentMeta,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Heading titles that mark the start of a references section, in either
/// Chinese or English academic convention.
pub const REFERENCE_HEADING_NAMES: &[&str] = &["参考文献", "References", "REFERENCES"];

impl DocAst {
    pub fn new(meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        Self { meta, blocks }
    }

    /// True if `title` names a level-1 heading already present among `blocks`.
    pub fn has_h1_titled(&self, title: &str) -> bool {
        self.blocks.iter().any(|block| {
            matches!(
                block,
                Block::Heading { level, text } if level.get() == 1 && text.trim() == title
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_content_plain_text_joins_inlines() {
        let content = ParagraphContent::Inlines(vec![
            Inline::Text { text: "a ".into() },
            Inline::Bold { text: "b".into() },
        ]);
        assert_eq!(content.plain_text(), "a b");
    }

    #[test]
    fn has_h1_titled_matches_trimmed_text() {
        let doc = DocAst::new(
            DocumentMeta::default(),
            vec![Block::Heading {
                level: HeadingLevel::try_from(1).unwrap(),
                text: " 参考文献 ".into(),
            }],
        );
        assert!(doc.has_h1_titled("参考文献"));
        assert!(!doc.has_h1_titled("致谢"));
    }
}
