//! CommonMark + GFM parsing into `DocAst`, via the `markdown` crate's mdast
//! tree, with front-matter extraction and the page/section-break sentinel
//! and bibliography-merge post-passes.

use eyre::{eyre, Result};
use markdown::mdast::Node as MdNode;
use markdown::ParseOptions;
use styledoc_schema::{Block, DocAst, DocumentMeta, HeadingLevel, Inline, ParagraphContent, REFERENCE_HEADING_NAMES};

use crate::frontmatter::{split_front_matter, string_field};

const PAGE_BREAK_SENTINELS: &[&str] = &["<!-- pagebreak -->", "<!--PAGEBREAK-->", "[[PAGEBREAK]]", "\u{c}"];
const SECTION_BREAK_SENTINELS: &[&str] = &["<!-- sectionbreak -->", "<!--SECTIONBREAK-->", "[[SECTIONBREAK]]"];

pub fn parse_markdown(input: &str) -> Result<DocAst> {
    let (front_matter, body) = split_front_matter(input);
    let meta = front_matter.as_ref().map(meta_from_front_matter).unwrap_or_default();

    let tree = markdown::to_mdast(body, &ParseOptions::gfm()).map_err(|err| eyre!("failed to parse markdown: {err}"))?;
    let MdNode::Root(root) = tree else {
        return Err(eyre!("markdown parser did not return a root node"));
    };

    let mut blocks: Vec<Block> = root.children.iter().filter_map(block_from_node).collect();
    merge_bibliography(&mut blocks);

    Ok(DocAst::new(meta, blocks))
}

fn meta_from_front_matter(value: &serde_json::Value) -> DocumentMeta {
    let mut extras = std::collections::HashMap::new();
    if let serde_json::Value::Object(map) = value {
        for (key, val) in map {
            if matches!(key.as_str(), "title" | "title_en" | "author" | "advisor" | "program") {
                continue;
            }
            if let Some(text) = val.as_str() {
                extras.insert(key.clone(), text.to_string());
            }
        }
    }
    DocumentMeta {
        title: string_field(value, "title"),
        title_en: string_field(value, "title_en"),
        author: string_field(value, "author"),
        advisor: string_field(value, "advisor"),
        program: string_field(value, "program"),
        extras,
    }
}

fn collect_text(children: &[MdNode]) -> String {
    children.iter().map(node_text).collect()
}

fn node_text(node: &MdNode) -> String {
    match node {
        MdNode::Text(text) => text.value.clone(),
        MdNode::InlineCode(code) => code.value.clone(),
        MdNode::Strong(n) => collect_text(&n.children),
        MdNode::Emphasis(n) => collect_text(&n.children),
        MdNode::Delete(n) => collect_text(&n.children),
        MdNode::Link(n) => collect_text(&n.children),
        MdNode::Break(_) => "\n".to_string(),
        _ => String::new(),
    }
}

fn inlines_from_children(children: &[MdNode]) -> Vec<Inline> {
    children
        .iter()
        .filter_map(|child| match child {
            MdNode::Text(text) => Some(Inline::Text { text: text.value.clone() }),
            MdNode::Strong(n) => Some(Inline::Bold { text: collect_text(&n.children) }),
            MdNode::Emphasis(n) => Some(Inline::Italic { text: collect_text(&n.children) }),
            MdNode::Delete(n) => Some(Inline::Text { text: collect_text(&n.children) }),
            MdNode::InlineCode(code) => Some(Inline::Code { text: code.value.clone() }),
            MdNode::Link(n) => Some(Inline::Text { text: collect_text(&n.children) }),
            MdNode::Break(_) => Some(Inline::Text { text: "\n".to_string() }),
            _ => None,
        })
        .collect()
}

fn is_plain_text_only(children: &[MdNode]) -> bool {
    children.iter().all(|child| matches!(child, MdNode::Text(_)))
}

fn single_image(children: &[MdNode]) -> Option<(&str, Option<&str>)> {
    match children {
        [MdNode::Image(image)] => {
            let alt = if image.alt.is_empty() { None } else { Some(image.alt.as_str()) };
            Some((image.url.as_str(), alt))
        }
        _ => None,
    }
}

fn paragraph_content_block(children: &[MdNode]) -> Block {
    if is_plain_text_only(children) {
        Block::Paragraph { content: ParagraphContent::Text(collect_text(children)) }
    } else {
        Block::Paragraph { content: ParagraphContent::Inlines(inlines_from_children(children)) }
    }
}

fn block_from_node(node: &MdNode) -> Option<Block> {
    match node {
        MdNode::Heading(heading) => {
            Some(Block::Heading { level: HeadingLevel::clamp_new(heading.depth), text: collect_text(&heading.children) })
        }
        MdNode::Paragraph(paragraph) => {
            let text = collect_text(&paragraph.children).trim().to_string();
            if PAGE_BREAK_SENTINELS.contains(&text.as_str()) {
                return Some(Block::PageBreak);
            }
            if SECTION_BREAK_SENTINELS.contains(&text.as_str()) {
                return Some(Block::SectionBreak { next_page: true });
            }
            if let Some((src, caption)) = single_image(&paragraph.children) {
                return Some(Block::Figure { src: src.to_string(), caption: caption.map(str::to_string) });
            }
            Some(paragraph_content_block(&paragraph.children))
        }
        MdNode::List(list) => {
            let items = list
                .children
                .iter()
                .filter_map(|item| match item {
                    MdNode::ListItem(list_item) => Some(list_item_inlines(list_item)),
                    _ => None,
                })
                .collect();
            Some(Block::List { ordered: list.ordered, items })
        }
        MdNode::Table(table) => {
            let rows = table
                .children
                .iter()
                .filter_map(|row| match row {
                    MdNode::TableRow(table_row) => Some(table_row_cells(table_row)),
                    _ => None,
                })
                .collect();
            Some(Block::Table { rows, caption: None })
        }
        MdNode::ThematicBreak(_) => Some(Block::PageBreak),
        _ => None,
    }
}

fn list_item_inlines(item: &markdown::mdast::ListItem) -> Vec<Inline> {
    for child in &item.children {
        if let MdNode::Paragraph(paragraph) = child {
            return inlines_from_children(&paragraph.children);
        }
    }
    vec![Inline::Text { text: collect_text(&item.children) }]
}

fn table_row_cells(row: &markdown::mdast::TableRow) -> Vec<String> {
    row.children
        .iter()
        .filter_map(|cell| match cell {
            MdNode::TableCell(table_cell) => Some(collect_text(&table_cell.children)),
            _ => None,
        })
        .collect()
}

/// Merge a run of `[n]`-prefixed paragraphs following a references heading
/// into a single `Bibliography` block.
fn merge_bibliography(blocks: &mut Vec<Block>) {
    let reference_start = blocks.iter().position(|block| {
        matches!(block, Block::Heading { level, text } if level.get() == 1 && REFERENCE_HEADING_NAMES.contains(&text.trim()))
    });
    let Some(heading_index) = reference_start else { return };

    let mut items = Vec::new();
    let mut end = heading_index + 1;
    while end < blocks.len() {
        let Block::Paragraph { content } = &blocks[end] else { break };
        let text = content.plain_text();
        if !text.trim_start().starts_with('[') {
            break;
        }
        items.push(text);
        end += 1;
    }
    if items.is_empty() {
        return;
    }
    blocks.splice(heading_index + 1..end, std::iter::once(Block::Bibliography { items }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_heading_and_paragraph() {
        let doc = parse_markdown("# A\n\nhello\n").unwrap();
        assert_eq!(doc.blocks.len(), 2);
        assert!(matches!(&doc.blocks[0], Block::Heading { text, .. } if text == "A"));
        assert!(matches!(&doc.blocks[1], Block::Paragraph { content } if content.plain_text() == "hello"));
    }

    #[test]
    fn front_matter_populates_meta() {
        let doc = parse_markdown("---\ntitle: My Thesis\n---\nbody\n").unwrap();
        assert_eq!(doc.meta.title.as_deref(), Some("My Thesis"));
    }

    #[test]
    fn page_break_sentinel_becomes_block() {
        let doc = parse_markdown("a\n\n[[PAGEBREAK]]\n\nb\n").unwrap();
        assert!(doc.blocks.iter().any(|b| matches!(b, Block::PageBreak)));
    }

    #[test]
    fn bibliography_paragraphs_are_merged() {
        let doc = parse_markdown("# 参考文献\n\n[1] Author, Title.\n\n[2] Another, Work.\n").unwrap();
        assert!(matches!(doc.blocks.last(), Some(Block::Bibliography { items }) if items.len() == 2));
    }

    #[test]
    fn table_rows_are_captured() {
        let doc = parse_markdown("| a | b |\n| - | - |\n| 1 | 2 |\n").unwrap();
        assert!(matches!(&doc.blocks[0], Block::Table { rows, .. } if rows.len() == 2));
    }
}
