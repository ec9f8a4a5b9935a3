//! A heuristic line-oriented parser for plain, unstructured text: blank
//! lines separate paragraphs, sentinel lines become breaks, and a leading
//! `1.2.3 Title` numbering pattern is read as a heading.

use std::sync::LazyLock;

use regex::Regex;
use styledoc_schema::{Block, DocAst, DocumentMeta, HeadingLevel, ParagraphContent};

const PAGE_BREAK_SENTINELS: &[&str] = &["<!-- pagebreak -->", "<!--PAGEBREAK-->", "[[PAGEBREAK]]", "\u{c}"];
const SECTION_BREAK_SENTINELS: &[&str] = &["<!-- sectionbreak -->", "<!--SECTIONBREAK-->", "[[SECTIONBREAK]]"];

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:[.．]\d+)*)\s+(.+?)\s*$").expect("static heading regex is valid"));

pub fn parse_plaintext(input: &str) -> DocAst {
    let mut blocks = Vec::new();
    let mut paragraph_lines: Vec<&str> = Vec::new();

    let flush = |blocks: &mut Vec<Block>, lines: &mut Vec<&str>| {
        if lines.is_empty() {
            return;
        }
        let text = lines.join(" ").trim().to_string();
        if !text.is_empty() {
            blocks.push(Block::Paragraph { content: ParagraphContent::Text(text) });
        }
        lines.clear();
    };

    for raw_line in input.lines() {
        let line = raw_line.trim_end();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut blocks, &mut paragraph_lines);
            continue;
        }
        if PAGE_BREAK_SENTINELS.contains(&trimmed) {
            flush(&mut blocks, &mut paragraph_lines);
            blocks.push(Block::PageBreak);
            continue;
        }
        if SECTION_BREAK_SENTINELS.contains(&trimmed) {
            flush(&mut blocks, &mut paragraph_lines);
            blocks.push(Block::SectionBreak { next_page: true });
            continue;
        }
        if let Some(captures) = HEADING_RE.captures(line) {
            flush(&mut blocks, &mut paragraph_lines);
            let prefix = captures.get(1).expect("heading regex always has a numeric prefix group").as_str();
            let depth = 1 + prefix.chars().filter(|c| *c == '.' || *c == '．').count() as u8;
            let title = captures.get(2).expect("heading regex always has a title group").as_str().to_string();
            blocks.push(Block::Heading { level: HeadingLevel::clamp_new(depth.min(3)), text: title });
            continue;
        }
        paragraph_lines.push(trimmed);
    }
    flush(&mut blocks, &mut paragraph_lines);

    DocAst::new(DocumentMeta::default(), blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_line_becomes_heading() {
        let doc = parse_plaintext("1 Intro\n\nBody text.\n");
        assert!(matches!(&doc.blocks[0], Block::Heading { level, text } if level.get() == 1 && text == "Intro"));
        assert!(matches!(&doc.blocks[1], Block::Paragraph { content } if content.plain_text() == "Body text."));
    }

    #[test]
    fn deep_numbering_clamps_to_level_three() {
        let doc = parse_plaintext("1.1.1.1 Deep\n");
        assert!(matches!(&doc.blocks[0], Block::Heading { level, .. } if level.get() == 3));
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let doc = parse_plaintext("line one\nline two\n\nline three\n");
        assert_eq!(doc.blocks.len(), 2);
    }
}
